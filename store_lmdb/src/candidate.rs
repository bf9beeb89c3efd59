//! LMDB implementation of CandidateStore. Both tables are keyed
//! `election_be ++ candidate_be`, so a prefix scan returns one election's
//! rows in candidate-id order.

use ballot_store::{CandidateStore, StoreError};
use ballot_types::{Candidate, CandidateId, CandidateTally, ElectionId};

use crate::keys::{candidate_key, id_key};
use crate::LmdbEnvironment;

impl CandidateStore for LmdbEnvironment {
    fn get_candidate(
        &self,
        election: ElectionId,
        candidate: CandidateId,
    ) -> Result<Option<Candidate>, StoreError> {
        self.get_value(self.candidates_db, &candidate_key(election, candidate))
    }

    fn get_candidates(&self, election: ElectionId) -> Result<Vec<Candidate>, StoreError> {
        self.scan_prefix(self.candidates_db, &id_key(election))
    }

    fn get_tally(
        &self,
        election: ElectionId,
        candidate: CandidateId,
    ) -> Result<Option<CandidateTally>, StoreError> {
        self.get_value(self.tallies_db, &candidate_key(election, candidate))
    }

    fn get_tallies(&self, election: ElectionId) -> Result<Vec<CandidateTally>, StoreError> {
        self.scan_prefix(self.tallies_db, &id_key(election))
    }
}
