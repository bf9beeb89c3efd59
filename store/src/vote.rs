//! Vote ledger storage trait.

use crate::StoreError;
use ballot_types::{AccountId, ElectionId, Vote};

pub trait VoteStore {
    /// Get the live vote of `voter` in `election`, if any.
    fn get_vote(&self, election: ElectionId, voter: &AccountId) -> Result<Option<Vote>, StoreError>;

    /// All live votes of an election.
    fn get_votes(&self, election: ElectionId) -> Result<Vec<Vote>, StoreError>;
}
