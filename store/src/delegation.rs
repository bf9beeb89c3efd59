use crate::StoreError;
use ballot_types::{AccountId, DelegatedPower, Delegation, ElectionId};

pub trait DelegationStore {
    /// The delegation edge recorded for `delegator` in `election`, active or not.
    fn get_delegation(
        &self,
        delegator: &AccountId,
        election: ElectionId,
    ) -> Result<Option<Delegation>, StoreError>;

    /// Reverse index: power delegated to `delegate` in `election`.
    fn get_delegated_power(
        &self,
        delegate: &AccountId,
        election: ElectionId,
    ) -> Result<Option<DelegatedPower>, StoreError>;
}
