//! Election finalization.
//!
//! Finalization freezes an [`ElectionResult`] once the election window has
//! closed and marks the election inactive. It happens once per election.
//!
//! # Winner selection
//!
//! - Ranked elections run instant runoff over the live votes' preference
//!   lists. Each round every ballot counts its weight for its highest-ranked
//!   remaining candidate. A candidate holding more than half of the counted
//!   weight wins; otherwise the lowest total is eliminated, ties eliminating
//!   the highest candidate id.
//! - All other types use plurality on weighted tallies, ties going to the
//!   lowest candidate id.
//!
//! Abstentions count toward turnout and quorum but never win.

use std::collections::{BTreeMap, BTreeSet};

use ballot_store::{Counter, GovernanceStore, WriteBatch};
use ballot_types::{CandidateId, CandidateTally, ElectionId, ElectionResult, ElectionType, Vote};

use crate::engine::require_owner;
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::votes::ABSTAIN_CANDIDATE;
use crate::{CallContext, GovernanceEngine};

impl<S: GovernanceStore> GovernanceEngine<S> {
    /// Finalize an ended election. Owner only.
    pub fn finalize_election(
        &mut self,
        ctx: &CallContext,
        election_id: ElectionId,
    ) -> Result<ElectionResult, GovernanceError> {
        let mut election = self.load_election(election_id)?;
        let config = self.config()?;
        require_owner(&config, &ctx.caller)?;
        if !election.has_ended(ctx.height) {
            return Err(GovernanceError::NotYetEnded {
                election_id,
                end_height: election.end_height,
            });
        }
        if self
            .store
            .get_election_result(election_id)?
            .is_some_and(|r| r.finalized)
        {
            return Err(GovernanceError::AlreadyFinalized(election_id));
        }

        let tallies = self.store.get_tallies(election_id)?;
        let winner = match election.election_type {
            ElectionType::Ranked => {
                let candidates: Vec<CandidateId> = self
                    .store
                    .get_candidates(election_id)?
                    .into_iter()
                    .filter(|c| c.active)
                    .map(|c| c.candidate_id)
                    .collect();
                instant_runoff(&candidates, &self.store.get_votes(election_id)?)
            }
            ElectionType::Simple
            | ElectionType::Weighted
            | ElectionType::Delegated
            | ElectionType::Proposal => plurality(&tallies),
        };

        let total_votes: u64 = tallies.iter().map(|t| t.vote_count).sum();
        let eligible = match config.eligible_voters {
            Some(count) => count,
            None => self.store.get_counter(Counter::RegisteredVoters)?,
        };
        let (turnout_percent, quorum_met) =
            turnout_and_quorum(total_votes, eligible, election.quorum_required);

        let result = ElectionResult {
            election_id,
            winner,
            total_votes,
            turnout_percent,
            quorum_met,
            finalized: true,
            finalized_at: ctx.height,
        };
        election.active = false;

        let mut batch = WriteBatch::new();
        batch.put_election_result(result.clone());
        batch.put_election(election);
        self.commit(
            batch,
            vec![GovernanceEvent::ElectionFinalized {
                election_id,
                winner,
                quorum_met,
            }],
        )?;
        tracing::info!(
            election_id,
            ?winner,
            total_votes,
            turnout_percent,
            quorum_met,
            "election finalized"
        );
        Ok(result)
    }

    pub fn get_election_results(
        &self,
        election_id: ElectionId,
    ) -> Result<Option<ElectionResult>, GovernanceError> {
        Ok(self.store.get_election_result(election_id)?)
    }
}

/// Turnout percentage (capped at 100) and whether the quorum was reached.
///
/// With no eligible voters turnout is zero and only a zero quorum is met.
fn turnout_and_quorum(total_votes: u64, eligible: u64, quorum: u8) -> (u64, bool) {
    if eligible == 0 {
        return (0, quorum == 0);
    }
    let participation = u128::from(total_votes) * 100;
    let turnout = (participation / u128::from(eligible)).min(100) as u64;
    let quorum_met = participation >= u128::from(eligible) * u128::from(quorum);
    (turnout, quorum_met)
}

/// Candidate with the highest weighted total, lowest id on ties.
fn plurality(tallies: &[CandidateTally]) -> Option<CandidateId> {
    let mut best: Option<&CandidateTally> = None;
    for tally in tallies {
        if tally.candidate_id == ABSTAIN_CANDIDATE || tally.weighted_votes == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some(current) => {
                tally.weighted_votes > current.weighted_votes
                    || (tally.weighted_votes == current.weighted_votes
                        && tally.candidate_id < current.candidate_id)
            }
        };
        if better {
            best = Some(tally);
        }
    }
    best.map(|t| t.candidate_id)
}

/// Instant-runoff winner among `candidates`.
fn instant_runoff(candidates: &[CandidateId], votes: &[Vote]) -> Option<CandidateId> {
    let ballots: Vec<(Vec<CandidateId>, u64)> = votes
        .iter()
        .filter(|v| v.candidate_id != ABSTAIN_CANDIDATE)
        .map(|v| (v.preferences(), v.weight))
        .collect();
    let mut remaining: BTreeSet<CandidateId> = candidates.iter().copied().collect();

    while !remaining.is_empty() {
        let mut counts: BTreeMap<CandidateId, u128> =
            remaining.iter().map(|&c| (c, 0)).collect();
        for (preferences, weight) in &ballots {
            if let Some(top) = preferences.iter().find(|c| remaining.contains(*c)) {
                if let Some(count) = counts.get_mut(top) {
                    *count += u128::from(*weight);
                }
            }
        }
        let total: u128 = counts.values().sum();
        if total == 0 {
            return None;
        }
        if let Some((&leader, _)) = counts.iter().find(|&(_, &count)| count * 2 > total) {
            return Some(leader);
        }
        // lowest count loses; among equals the highest id goes first
        let (&loser, _) = counts
            .iter()
            .min_by(|(a_id, a), (b_id, b)| a.cmp(b).then(b_id.cmp(a_id)))?;
        tracing::debug!(eliminated = loser, round_total = %total, "runoff elimination");
        remaining.remove(&loser);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{account, ctx, election_with_candidates, engine, OWNER};
    use ballot_types::{AccountId, BlockHeight};

    fn tally(candidate_id: CandidateId, weighted: u64) -> CandidateTally {
        CandidateTally {
            election_id: 1,
            candidate_id,
            vote_count: weighted,
            weighted_votes: weighted,
            delegated_votes: 0,
        }
    }

    fn ranked(voter: &str, prefs: &[CandidateId]) -> Vote {
        Vote {
            election_id: 1,
            voter: AccountId::new(voter),
            candidate_id: prefs[0],
            cast_height: BlockHeight::new(1),
            voting_power: 1,
            is_delegated: false,
            delegators: Vec::new(),
            weight: 1,
            ranked_choices: prefs.to_vec(),
        }
    }

    #[test]
    fn plurality_prefers_lowest_id_on_tie() {
        assert_eq!(plurality(&[tally(1, 5), tally(2, 7), tally(3, 7)]), Some(2));
        assert_eq!(plurality(&[tally(0, 9), tally(4, 1)]), Some(4));
        assert_eq!(plurality(&[tally(1, 0), tally(2, 0)]), None);
        assert_eq!(plurality(&[]), None);
    }

    #[test]
    fn runoff_transfers_eliminated_preferences() {
        // first round 2-2-1, candidate 3 is eliminated and its ballot moves to 2
        let votes = vec![
            ranked("a", &[1]),
            ranked("b", &[1]),
            ranked("c", &[2]),
            ranked("d", &[2]),
            ranked("e", &[3, 2]),
        ];
        assert_eq!(instant_runoff(&[1, 2, 3], &votes), Some(2));
    }

    #[test]
    fn runoff_tie_eliminates_highest_id() {
        let votes = vec![ranked("a", &[1]), ranked("b", &[2])];
        assert_eq!(instant_runoff(&[1, 2], &votes), Some(1));
        assert_eq!(instant_runoff(&[1, 2], &[]), None);
    }

    #[test]
    fn turnout_and_quorum_rules() {
        assert_eq!(turnout_and_quorum(5, 10, 50), (50, true));
        assert_eq!(turnout_and_quorum(4, 10, 50), (40, false));
        assert_eq!(turnout_and_quorum(30, 10, 100), (100, true));
        assert_eq!(turnout_and_quorum(3, 0, 0), (0, true));
        assert_eq!(turnout_and_quorum(3, 0, 1), (0, false));
        assert_eq!(turnout_and_quorum(u64::MAX, u64::MAX, 100), (100, true));
    }

    #[test]
    fn finalize_records_result_and_deactivates() {
        let mut engine = engine();
        engine.set_eligible_voters(&ctx(OWNER, 0), Some(4)).unwrap();
        let id = election_with_candidates(&mut engine, ElectionType::Simple, 0, 10, false);
        engine.cast_vote(&ctx("a", 1), id, 1, None).unwrap();
        engine.cast_vote(&ctx("b", 2), id, 2, None).unwrap();
        engine.cast_vote(&ctx("c", 3), id, 2, None).unwrap();

        let result = engine.finalize_election(&ctx(OWNER, 10), id).unwrap();
        assert_eq!(result.winner, Some(2));
        assert_eq!(result.total_votes, 3);
        assert_eq!(result.turnout_percent, 75);
        assert!(result.quorum_met);
        assert!(!engine.get_election_info(id).unwrap().unwrap().active);
        assert_eq!(engine.get_election_results(id).unwrap(), Some(result));
    }

    #[test]
    fn finalize_checks_in_order() {
        let mut engine = engine();
        let id = election_with_candidates(&mut engine, ElectionType::Simple, 0, 10, false);
        assert!(matches!(
            engine.finalize_election(&ctx(OWNER, 10), 9),
            Err(GovernanceError::ElectionNotFound(9))
        ));
        assert!(matches!(
            engine.finalize_election(&ctx("mallory", 10), id),
            Err(GovernanceError::Unauthorized(_))
        ));
        assert!(matches!(
            engine.finalize_election(&ctx(OWNER, 9), id),
            Err(GovernanceError::NotYetEnded { .. })
        ));
        engine.finalize_election(&ctx(OWNER, 10), id).unwrap();
        assert!(matches!(
            engine.finalize_election(&ctx(OWNER, 11), id),
            Err(GovernanceError::AlreadyFinalized(_))
        ));
    }

    #[test]
    fn empty_election_has_no_winner() {
        let mut engine = engine();
        engine.register_voter(&ctx("a", 0), 1).unwrap();
        let id = election_with_candidates(&mut engine, ElectionType::Weighted, 0, 5, false);
        let result = engine.finalize_election(&ctx(OWNER, 5), id).unwrap();
        assert_eq!(result.winner, None);
        assert_eq!(result.turnout_percent, 0);
        assert!(!result.quorum_met);
        assert!(engine.get_vote(id, &account("a")).unwrap().is_none());
    }

    #[test]
    fn ranked_election_uses_runoff() {
        let mut engine = engine();
        let id = election_with_candidates(&mut engine, ElectionType::Ranked, 0, 10, false);
        engine
            .add_candidate(&ctx(OWNER, 0), id, 3, "third", "", None)
            .unwrap();
        engine.cast_vote(&ctx("a", 1), id, 1, None).unwrap();
        engine.cast_vote(&ctx("b", 1), id, 1, None).unwrap();
        engine.cast_vote(&ctx("c", 1), id, 2, None).unwrap();
        engine.cast_vote(&ctx("d", 1), id, 2, None).unwrap();
        engine.cast_vote(&ctx("e", 1), id, 3, Some(vec![3, 2])).unwrap();
        engine.cast_vote(&ctx("f", 1), id, ABSTAIN_CANDIDATE, None).unwrap();

        let result = engine.finalize_election(&ctx(OWNER, 10), id).unwrap();
        assert_eq!(result.winner, Some(2));
        assert_eq!(result.total_votes, 6);
    }
}
