//! Vote expiry and permissionless cleanup.
//!
//! A vote stays valid while all of the following hold:
//! - it was cast inside the election window `[start, end]`
//! - no more than `vote_expiry_period` blocks have passed since the cast
//! - the election has not ended
//!
//! Anyone may remove an invalid vote. Removal deletes the vote and takes its
//! stored weight back out of the candidate's tally in the same batch.
//!
//! Once the election has ended every vote is invalid, but the tallies are
//! what finalization counts. Cleanup therefore leaves an ended election alone
//! until its result has been recorded.

use std::collections::btree_map::{BTreeMap, Entry};

use ballot_store::{GovernanceStore, WriteBatch};
use ballot_types::{
    AccountId, BlockHeight, CandidateId, CandidateTally, Election, ElectionId, Vote,
};
use serde::Serialize;

use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::tally::apply_removal;
use crate::{CallContext, GovernanceEngine};

/// What a cleanup call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CleanupOutcome {
    /// No vote on record; nothing to do.
    NoVote,
    /// The vote is still valid and was left in place.
    StillValid,
    /// The election has ended but is not finalized; its votes stay counted.
    AwaitingFinalization,
    /// The vote was removed and its weight taken off the tally.
    Removed {
        candidate_id: CandidateId,
        weight: u64,
    },
}

fn vote_is_valid(election: &Election, vote: &Vote, expiry_period: u64, now: BlockHeight) -> bool {
    election.spans(vote.cast_height)
        && vote.cast_height.elapsed_since(now) <= expiry_period
        && now < election.end_height
}

impl<S: GovernanceStore> GovernanceEngine<S> {
    /// Whether `voter` holds a valid vote in `election_id` at `height`.
    /// A missing election or vote is not valid.
    pub fn is_vote_valid(
        &self,
        election_id: ElectionId,
        voter: &AccountId,
        height: BlockHeight,
    ) -> Result<bool, GovernanceError> {
        let Some(election) = self.store.get_election(election_id)? else {
            return Ok(false);
        };
        let Some(vote) = self.store.get_vote(election_id, voter)? else {
            return Ok(false);
        };
        let config = self.config()?;
        Ok(vote_is_valid(&election, &vote, config.vote_expiry_period, height))
    }

    /// Remove `voter`'s vote if it is no longer valid.
    ///
    /// Calling this again after a removal is a no-op returning
    /// [`CleanupOutcome::NoVote`].
    pub fn cleanup_expired_vote(
        &mut self,
        ctx: &CallContext,
        election_id: ElectionId,
        voter: &AccountId,
    ) -> Result<CleanupOutcome, GovernanceError> {
        let (Some(election), Some(vote)) = (
            self.store.get_election(election_id)?,
            self.store.get_vote(election_id, voter)?,
        ) else {
            tracing::debug!(election_id, voter = %voter, "no vote to clean up");
            return Ok(CleanupOutcome::NoVote);
        };
        let config = self.config()?;
        if vote_is_valid(&election, &vote, config.vote_expiry_period, ctx.height) {
            tracing::debug!(election_id, voter = %voter, "vote still valid, nothing removed");
            return Ok(CleanupOutcome::StillValid);
        }
        if self.awaiting_finalization(&election, ctx.height)? {
            tracing::debug!(election_id, voter = %voter, "election not finalized, vote kept");
            return Ok(CleanupOutcome::AwaitingFinalization);
        }

        let mut tally = self
            .store
            .get_tally(election_id, vote.candidate_id)?
            .unwrap_or_else(|| CandidateTally::zeroed(election_id, vote.candidate_id));
        apply_removal(&mut tally, &vote);

        let mut batch = WriteBatch::new();
        batch.delete_vote(election_id, voter.clone());
        batch.put_tally(tally);
        self.commit(
            batch,
            vec![GovernanceEvent::VoteExpired {
                election_id,
                voter: voter.clone(),
                candidate_id: vote.candidate_id,
                weight: vote.weight,
            }],
        )?;
        tracing::info!(
            election_id,
            voter = %voter,
            candidate_id = vote.candidate_id,
            weight = vote.weight,
            cleaned_by = %ctx.caller,
            "expired vote removed"
        );
        Ok(CleanupOutcome::Removed {
            candidate_id: vote.candidate_id,
            weight: vote.weight,
        })
    }

    /// Remove every invalid vote of an election in one batch. Returns how
    /// many votes were removed; an ended election that is not yet finalized
    /// is left untouched.
    pub fn sweep_expired_votes(
        &mut self,
        ctx: &CallContext,
        election_id: ElectionId,
    ) -> Result<usize, GovernanceError> {
        let election = self.load_election(election_id)?;
        if self.awaiting_finalization(&election, ctx.height)? {
            tracing::debug!(election_id, "election not finalized, sweep skipped");
            return Ok(0);
        }
        let config = self.config()?;

        let expired: Vec<Vote> = self
            .store
            .get_votes(election_id)?
            .into_iter()
            .filter(|vote| !vote_is_valid(&election, vote, config.vote_expiry_period, ctx.height))
            .collect();
        if expired.is_empty() {
            tracing::debug!(election_id, "sweep found no expired votes");
            return Ok(0);
        }

        let mut tallies = BTreeMap::new();
        let mut batch = WriteBatch::new();
        let mut events = Vec::with_capacity(expired.len());
        for vote in &expired {
            let tally = match tallies.entry(vote.candidate_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(
                    self.store
                        .get_tally(election_id, vote.candidate_id)?
                        .unwrap_or_else(|| CandidateTally::zeroed(election_id, vote.candidate_id)),
                ),
            };
            apply_removal(tally, vote);
            batch.delete_vote(election_id, vote.voter.clone());
            events.push(GovernanceEvent::VoteExpired {
                election_id,
                voter: vote.voter.clone(),
                candidate_id: vote.candidate_id,
                weight: vote.weight,
            });
        }
        for tally in tallies.into_values() {
            batch.put_tally(tally);
        }
        self.commit(batch, events)?;
        tracing::info!(election_id, removed = expired.len(), "expired votes swept");
        Ok(expired.len())
    }

    fn awaiting_finalization(
        &self,
        election: &Election,
        now: BlockHeight,
    ) -> Result<bool, GovernanceError> {
        if !election.has_ended(now) {
            return Ok(false);
        }
        Ok(!self
            .store
            .get_election_result(election.id)?
            .is_some_and(|r| r.finalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{account, ctx, election_with_candidates, engine, OWNER};
    use ballot_store::CandidateStore;
    use ballot_types::ElectionType;

    #[test]
    fn expiry_window_boundaries() {
        let mut engine = engine();
        engine.set_vote_expiry_period(&ctx(OWNER, 0), 10).unwrap();
        let id = election_with_candidates(&mut engine, ElectionType::Simple, 0, 100, false);
        engine.cast_vote(&ctx("alice", 5), id, 1, None).unwrap();

        let alice = account("alice");
        assert!(engine.is_vote_valid(id, &alice, BlockHeight::new(15)).unwrap());
        assert!(!engine.is_vote_valid(id, &alice, BlockHeight::new(16)).unwrap());
        assert!(!engine.is_vote_valid(id, &account("bob"), BlockHeight::new(6)).unwrap());
        assert!(!engine.is_vote_valid(77, &alice, BlockHeight::new(6)).unwrap());
    }

    #[test]
    fn votes_lapse_when_election_ends() {
        let mut engine = engine();
        let id = election_with_candidates(&mut engine, ElectionType::Simple, 0, 20, false);
        engine.cast_vote(&ctx("alice", 19), id, 1, None).unwrap();
        assert!(engine.is_vote_valid(id, &account("alice"), BlockHeight::new(19)).unwrap());
        assert!(!engine.is_vote_valid(id, &account("alice"), BlockHeight::new(20)).unwrap());
    }

    #[test]
    fn cleanup_removes_once() {
        let mut engine = engine();
        engine.set_vote_expiry_period(&ctx(OWNER, 0), 10).unwrap();
        let id = election_with_candidates(&mut engine, ElectionType::Weighted, 0, 100, false);
        engine.register_voter(&ctx("alice", 1), 8).unwrap();
        engine.cast_vote(&ctx("alice", 5), id, 1, None).unwrap();

        let alice = account("alice");
        assert_eq!(
            engine.cleanup_expired_vote(&ctx("anyone", 15), id, &alice).unwrap(),
            CleanupOutcome::StillValid
        );
        assert_eq!(
            engine.cleanup_expired_vote(&ctx("anyone", 16), id, &alice).unwrap(),
            CleanupOutcome::Removed {
                candidate_id: 1,
                weight: 8
            }
        );
        let tally = engine.store().get_tally(id, 1).unwrap().unwrap();
        assert_eq!((tally.vote_count, tally.weighted_votes), (0, 0));

        let commits = engine.store().commit_count();
        assert_eq!(
            engine.cleanup_expired_vote(&ctx("anyone", 17), id, &alice).unwrap(),
            CleanupOutcome::NoVote
        );
        assert_eq!(engine.store().commit_count(), commits);
    }

    #[test]
    fn ended_election_keeps_votes_until_finalized() {
        let mut engine = engine();
        let id = election_with_candidates(&mut engine, ElectionType::Simple, 0, 100, false);
        for voter in ["a", "b", "c"] {
            engine.cast_vote(&ctx(voter, 95), id, 1, None).unwrap();
        }

        assert_eq!(engine.sweep_expired_votes(&ctx("mallory", 100), id).unwrap(), 0);
        assert_eq!(
            engine.cleanup_expired_vote(&ctx("mallory", 100), id, &account("a")).unwrap(),
            CleanupOutcome::AwaitingFinalization
        );
        assert_eq!(engine.store().get_tally(id, 1).unwrap().unwrap().vote_count, 3);

        let result = engine.finalize_election(&ctx(OWNER, 100), id).unwrap();
        assert_eq!((result.winner, result.total_votes), (Some(1), 3));

        assert_eq!(
            engine.cleanup_expired_vote(&ctx("anyone", 101), id, &account("a")).unwrap(),
            CleanupOutcome::Removed {
                candidate_id: 1,
                weight: 1
            }
        );
        assert_eq!(engine.sweep_expired_votes(&ctx("anyone", 101), id).unwrap(), 2);
        assert_eq!(engine.get_election_results(id).unwrap(), Some(result));
    }

    #[test]
    fn cleanup_on_missing_election_is_noop() {
        let mut engine = engine();
        assert_eq!(
            engine
                .cleanup_expired_vote(&ctx("anyone", 1), 5, &account("alice"))
                .unwrap(),
            CleanupOutcome::NoVote
        );
    }

    #[test]
    fn sweep_removes_only_expired() {
        let mut engine = engine();
        engine.set_vote_expiry_period(&ctx(OWNER, 0), 10).unwrap();
        let id = election_with_candidates(&mut engine, ElectionType::Simple, 0, 100, false);
        engine.cast_vote(&ctx("a", 1), id, 1, None).unwrap();
        engine.cast_vote(&ctx("b", 2), id, 1, None).unwrap();
        engine.cast_vote(&ctx("c", 20), id, 2, None).unwrap();

        assert_eq!(engine.sweep_expired_votes(&ctx("anyone", 25), id).unwrap(), 2);
        assert_eq!(engine.store().get_tally(id, 1).unwrap().unwrap().vote_count, 0);
        assert_eq!(engine.store().get_tally(id, 2).unwrap().unwrap().vote_count, 1);
        assert!(engine.verify_tallies(id).unwrap().is_empty());
        assert_eq!(engine.sweep_expired_votes(&ctx("anyone", 25), id).unwrap(), 0);
        assert!(matches!(
            engine.sweep_expired_votes(&ctx("anyone", 25), 404),
            Err(GovernanceError::ElectionNotFound(404))
        ));
    }
}
