//! Candidate and tally storage trait.

use crate::StoreError;
use ballot_types::{Candidate, CandidateId, CandidateTally, ElectionId};

pub trait CandidateStore {
    fn get_candidate(
        &self,
        election: ElectionId,
        candidate: CandidateId,
    ) -> Result<Option<Candidate>, StoreError>;

    /// All candidates of an election, ordered by candidate id.
    fn get_candidates(&self, election: ElectionId) -> Result<Vec<Candidate>, StoreError>;

    fn get_tally(
        &self,
        election: ElectionId,
        candidate: CandidateId,
    ) -> Result<Option<CandidateTally>, StoreError>;

    /// All tallies of an election, ordered by candidate id.
    fn get_tallies(&self, election: ElectionId) -> Result<Vec<CandidateTally>, StoreError>;
}
