//! LMDB implementation of DelegationStore.

use ballot_store::{DelegationStore, StoreError};
use ballot_types::{AccountId, DelegatedPower, Delegation, ElectionId};

use crate::keys::election_account_key;
use crate::LmdbEnvironment;

impl DelegationStore for LmdbEnvironment {
    fn get_delegation(
        &self,
        delegator: &AccountId,
        election: ElectionId,
    ) -> Result<Option<Delegation>, StoreError> {
        self.get_value(self.delegations_db, &election_account_key(election, delegator))
    }

    fn get_delegated_power(
        &self,
        delegate: &AccountId,
        election: ElectionId,
    ) -> Result<Option<DelegatedPower>, StoreError> {
        self.get_value(self.delegated_power_db, &election_account_key(election, delegate))
    }
}
