//! Per-election delegation edges and the reverse power index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{AccountId, BlockHeight, ElectionId};

/// A delegation edge, keyed by `(delegator, election_id)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: AccountId,
    pub election_id: ElectionId,
    pub delegate: AccountId,
    /// Delegator's voting power captured at delegation time.
    pub power: u64,
    pub active: bool,
    pub delegated_at: BlockHeight,
}

/// Sum of active incoming delegations, keyed by `(delegate, election_id)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedPower {
    pub delegate: AccountId,
    pub election_id: ElectionId,
    pub total_power: u64,
    pub delegators: BTreeSet<AccountId>,
}

impl DelegatedPower {
    pub fn empty(delegate: &AccountId, election_id: ElectionId) -> Self {
        Self {
            delegate: delegate.clone(),
            election_id,
            total_power: 0,
            delegators: BTreeSet::new(),
        }
    }

    /// Add a delegator's captured power.
    pub fn credit(&mut self, delegator: &AccountId, power: u64) {
        self.total_power = self.total_power.saturating_add(power);
        self.delegators.insert(delegator.clone());
    }

    /// Retract a delegator's captured power.
    pub fn debit(&mut self, delegator: &AccountId, power: u64) {
        self.total_power = self.total_power.saturating_sub(power);
        self.delegators.remove(delegator);
    }

    pub fn is_empty(&self) -> bool {
        self.delegators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_then_debit_returns_to_empty() {
        let bob = AccountId::new("bob");
        let alice = AccountId::new("alice");
        let mut index = DelegatedPower::empty(&bob, 7);
        index.credit(&alice, 25);
        assert_eq!(index.total_power, 25);
        assert!(!index.is_empty());

        index.debit(&alice, 25);
        assert_eq!(index.total_power, 0);
        assert!(index.is_empty());
    }

    #[test]
    fn debit_saturates() {
        let bob = AccountId::new("bob");
        let mut index = DelegatedPower::empty(&bob, 1);
        index.debit(&AccountId::new("carol"), 5);
        assert_eq!(index.total_power, 0);
    }
}
