//! Vote casting.

use std::collections::BTreeSet;

use ballot_store::{GovernanceStore, WriteBatch};
use ballot_types::{
    AccountId, CandidateId, CandidateTally, Election, ElectionId, Vote, MAX_RANKED_CHOICES,
};

use crate::engine::ensure_open;
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::tally::apply_cast;
use crate::{CallContext, GovernanceEngine};

/// Candidate id that records an abstention in elections allowing it.
pub const ABSTAIN_CANDIDATE: CandidateId = 0;

impl<S: GovernanceStore> GovernanceEngine<S> {
    /// Cast the caller's vote.
    ///
    /// `ranked_choices` is accepted only by ranked elections; when given, its
    /// first entry must be `candidate_id`. The vote, the candidate's tally and
    /// the voter's cast counter are written together.
    pub fn cast_vote(
        &mut self,
        ctx: &CallContext,
        election_id: ElectionId,
        candidate_id: CandidateId,
        ranked_choices: Option<Vec<CandidateId>>,
    ) -> Result<Vote, GovernanceError> {
        let election = self.load_election(election_id)?;
        ensure_open(&election, ctx.height)?;

        let power = self.get_effective_voting_power(election_id, &ctx.caller)?;
        if power == 0 {
            return Err(GovernanceError::ZeroVotingPower);
        }
        if election.require_registration && !self.is_registered(&ctx.caller)? {
            return Err(GovernanceError::NotEligible(ctx.caller.clone()));
        }
        if self.store.get_vote(election_id, &ctx.caller)?.is_some() {
            return Err(GovernanceError::AlreadyVoted {
                voter: ctx.caller.clone(),
            });
        }
        let mut tally = self.candidate_tally(&election, candidate_id)?;
        let ranked_choices = match ranked_choices {
            Some(choices) => self.validate_ranking(&election, candidate_id, choices)?,
            None => Vec::new(),
        };

        let delegators: Vec<AccountId> = self
            .store
            .get_delegated_power(&ctx.caller, election_id)?
            .filter(|p| p.total_power > 0)
            .map(|p| p.delegators.into_iter().collect())
            .unwrap_or_default();
        let weight = election.election_type.vote_weight(power);
        let vote = Vote {
            election_id,
            voter: ctx.caller.clone(),
            candidate_id,
            cast_height: ctx.height,
            voting_power: power,
            is_delegated: !delegators.is_empty(),
            delegators,
            weight,
            ranked_choices,
        };
        apply_cast(&mut tally, &vote);

        let mut batch = WriteBatch::new();
        batch.put_vote(vote.clone());
        batch.put_tally(tally);
        if let Some(mut voter) = self.store.get_voter(&ctx.caller)? {
            voter.total_votes_cast += 1;
            batch.put_voter(voter);
        }
        self.commit(
            batch,
            vec![GovernanceEvent::VoteCast {
                election_id,
                voter: ctx.caller.clone(),
                candidate_id,
                weight,
            }],
        )?;
        tracing::info!(
            election_id,
            voter = %ctx.caller,
            candidate_id,
            weight,
            delegated = vote.is_delegated,
            "vote cast"
        );
        Ok(vote)
    }

    /// The live vote of `voter`, if any. Expired but not yet cleaned votes
    /// are still returned; see [`is_vote_valid`](Self::is_vote_valid).
    pub fn get_vote(
        &self,
        election_id: ElectionId,
        voter: &AccountId,
    ) -> Result<Option<Vote>, GovernanceError> {
        Ok(self.store.get_vote(election_id, voter)?)
    }

    /// Current tally of the candidate a vote would land on.
    fn candidate_tally(
        &self,
        election: &Election,
        candidate_id: CandidateId,
    ) -> Result<CandidateTally, GovernanceError> {
        if candidate_id == ABSTAIN_CANDIDATE {
            if !election.allow_abstain {
                return Err(GovernanceError::InvalidCandidate(candidate_id));
            }
            // the abstain tally is created on first use
            return Ok(self
                .store
                .get_tally(election.id, candidate_id)?
                .unwrap_or_else(|| CandidateTally::zeroed(election.id, candidate_id)));
        }
        match self.store.get_candidate(election.id, candidate_id)? {
            Some(candidate) if candidate.active => Ok(self
                .store
                .get_tally(election.id, candidate_id)?
                .unwrap_or_else(|| CandidateTally::zeroed(election.id, candidate_id))),
            _ => Err(GovernanceError::InvalidCandidate(candidate_id)),
        }
    }

    fn validate_ranking(
        &self,
        election: &Election,
        candidate_id: CandidateId,
        choices: Vec<CandidateId>,
    ) -> Result<Vec<CandidateId>, GovernanceError> {
        let invalid = |reason: &str| Err(GovernanceError::InvalidRankedChoices(reason.to_string()));
        if !election.election_type.accepts_rankings() {
            return invalid("rankings are only accepted by ranked elections");
        }
        if choices.is_empty() || choices.len() > MAX_RANKED_CHOICES {
            return invalid("ranking must list between 1 and 10 candidates");
        }
        if choices[0] != candidate_id {
            return invalid("first preference must be the chosen candidate");
        }
        let mut seen = BTreeSet::new();
        for &choice in &choices {
            if choice == ABSTAIN_CANDIDATE {
                return invalid("abstention cannot be ranked");
            }
            if !seen.insert(choice) {
                return invalid("ranking lists a candidate twice");
            }
            if self.store.get_candidate(election.id, choice)?.is_none() {
                return Err(GovernanceError::InvalidRankedChoices(format!(
                    "unknown candidate {choice}"
                )));
            }
        }
        Ok(choices)
    }
}
