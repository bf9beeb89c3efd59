//! Incremental tallies.
//!
//! A tally is adjusted in the same batch that creates or removes a vote, so
//! it always equals the sum over live votes. `recompute` rebuilds that sum
//! from scratch and backs the consistency check.

use std::collections::BTreeMap;

use ballot_store::GovernanceStore;
use ballot_types::{CandidateId, CandidateTally, ElectionId, Vote};
use serde::Serialize;

use crate::error::GovernanceError;
use crate::GovernanceEngine;

/// Add a freshly cast vote to its candidate's tally.
pub fn apply_cast(tally: &mut CandidateTally, vote: &Vote) {
    tally.vote_count = tally.vote_count.saturating_add(1);
    tally.weighted_votes = tally.weighted_votes.saturating_add(vote.weight);
    if vote.is_delegated {
        tally.delegated_votes = tally.delegated_votes.saturating_add(vote.weight);
    }
}

/// Remove a vote's contribution. Counts saturate at zero.
pub fn apply_removal(tally: &mut CandidateTally, vote: &Vote) {
    let delegated = if vote.is_delegated { vote.weight } else { 0 };
    if tally.vote_count == 0 || tally.weighted_votes < vote.weight || tally.delegated_votes < delegated
    {
        tracing::warn!(
            election_id = tally.election_id,
            candidate_id = tally.candidate_id,
            voter = %vote.voter,
            weight = vote.weight,
            "tally underflow while removing vote, saturating at zero"
        );
    }
    tally.vote_count = tally.vote_count.saturating_sub(1);
    tally.weighted_votes = tally.weighted_votes.saturating_sub(vote.weight);
    tally.delegated_votes = tally.delegated_votes.saturating_sub(delegated);
}

/// Tallies derived from scratch over `votes`.
pub fn recompute(election_id: ElectionId, votes: &[Vote]) -> BTreeMap<CandidateId, CandidateTally> {
    let mut tallies = BTreeMap::new();
    for vote in votes {
        let tally = tallies
            .entry(vote.candidate_id)
            .or_insert_with(|| CandidateTally::zeroed(election_id, vote.candidate_id));
        apply_cast(tally, vote);
    }
    tallies
}

/// A stored tally that disagrees with the live votes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TallyMismatch {
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    pub stored: CandidateTally,
    pub expected: CandidateTally,
}

impl<S: GovernanceStore> GovernanceEngine<S> {
    /// Compare every stored tally of `election_id` with one recomputed from
    /// its live votes. An empty result means the election is consistent.
    pub fn verify_tallies(
        &self,
        election_id: ElectionId,
    ) -> Result<Vec<TallyMismatch>, GovernanceError> {
        self.load_election(election_id)?;
        let votes = self.store.get_votes(election_id)?;
        let mut expected = recompute(election_id, &votes);

        let mut mismatches = Vec::new();
        for stored in self.store.get_tallies(election_id)? {
            let want = expected
                .remove(&stored.candidate_id)
                .unwrap_or_else(|| CandidateTally::zeroed(election_id, stored.candidate_id));
            if want != stored {
                mismatches.push(TallyMismatch {
                    election_id,
                    candidate_id: stored.candidate_id,
                    stored,
                    expected: want,
                });
            }
        }
        // votes for a candidate with no stored tally at all
        for (candidate_id, want) in expected {
            mismatches.push(TallyMismatch {
                election_id,
                candidate_id,
                stored: CandidateTally::zeroed(election_id, candidate_id),
                expected: want,
            });
        }
        if !mismatches.is_empty() {
            tracing::warn!(election_id, count = mismatches.len(), "tally mismatch detected");
        }
        Ok(mismatches)
    }
}
