//! Election storage trait.

use crate::StoreError;
use ballot_types::{Election, ElectionId, ElectionResult};

pub trait ElectionStore {
    /// Get an election by id.
    fn get_election(&self, id: ElectionId) -> Result<Option<Election>, StoreError>;

    /// Get the frozen result of a finalized election.
    fn get_election_result(&self, id: ElectionId) -> Result<Option<ElectionResult>, StoreError>;
}
