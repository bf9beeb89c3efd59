use crate::StoreError;
use ballot_types::{AccountId, Voter};

pub trait VoterStore {
    fn get_voter(&self, account: &AccountId) -> Result<Option<Voter>, StoreError>;
}
