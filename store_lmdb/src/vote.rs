//! LMDB implementation of VoteStore.

use ballot_store::{StoreError, VoteStore};
use ballot_types::{AccountId, ElectionId, Vote};

use crate::keys::{election_account_key, id_key};
use crate::LmdbEnvironment;

impl VoteStore for LmdbEnvironment {
    fn get_vote(&self, election: ElectionId, voter: &AccountId) -> Result<Option<Vote>, StoreError> {
        self.get_value(self.votes_db, &election_account_key(election, voter))
    }

    fn get_votes(&self, election: ElectionId) -> Result<Vec<Vote>, StoreError> {
        self.scan_prefix(self.votes_db, &id_key(election))
    }
}
