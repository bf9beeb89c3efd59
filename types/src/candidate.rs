//! Candidates and their derived tallies.

use serde::{Deserialize, Serialize};

use crate::ElectionId;

/// Caller-chosen candidate identifier, unique within one election.
pub type CandidateId = u32;

/// A candidate standing in one election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    pub name: String,
    pub description: String,
    /// Optional hash of off-chain campaign material.
    pub content_hash: Option<[u8; 32]>,
    pub active: bool,
    pub campaign_fund: u128,
    pub endorsement_count: u32,
}

/// Aggregate counts for one candidate.
///
/// Always equal to the sum over the live votes that reference the candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    pub vote_count: u64,
    pub weighted_votes: u64,
    pub delegated_votes: u64,
}

impl CandidateTally {
    pub fn zeroed(election_id: ElectionId, candidate_id: CandidateId) -> Self {
        Self {
            election_id,
            candidate_id,
            ..Self::default()
        }
    }
}
