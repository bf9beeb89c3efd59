use ballot_store::{StoreError, VoterStore};
use ballot_types::{AccountId, Voter};

use crate::LmdbEnvironment;

impl VoterStore for LmdbEnvironment {
    fn get_voter(&self, account: &AccountId) -> Result<Option<Voter>, StoreError> {
        self.get_value(self.voters_db, account.as_bytes())
    }
}
