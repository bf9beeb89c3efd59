//! The governance configuration record.
//!
//! A single versioned record owned by the configuration authority. Every
//! operation reads it by value from the store at call time, so an update
//! takes effect on the very next call.

use serde::{Deserialize, Serialize};

use crate::AccountId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Incremented on every update.
    pub version: u64,

    /// Account allowed to perform owner-only operations.
    pub owner: AccountId,

    /// Maximum age, in blocks, a vote may reach and still count.
    pub vote_expiry_period: u64,

    /// Minimum voting power accepted at registration.
    pub minimum_voting_power: u64,

    /// Eligible-voter denominator for turnout and quorum.
    /// `None` falls back to the number of registered voters.
    pub eligible_voters: Option<u64>,

    /// Emergency pause; gates election creation and voter registration.
    pub paused: bool,
}

impl GovernanceConfig {
    /// Default vote expiry: roughly one day of 10-minute blocks.
    pub const DEFAULT_VOTE_EXPIRY_PERIOD: u64 = 144;

    /// Default minimum registration power.
    pub const DEFAULT_MINIMUM_VOTING_POWER: u64 = 1;

    /// Genesis configuration for a fresh store.
    pub fn genesis(owner: AccountId) -> Self {
        Self {
            version: 1,
            owner,
            vote_expiry_period: Self::DEFAULT_VOTE_EXPIRY_PERIOD,
            minimum_voting_power: Self::DEFAULT_MINIMUM_VOTING_POWER,
            eligible_voters: None,
            paused: false,
        }
    }

    pub fn is_owner(&self, account: &AccountId) -> bool {
        &self.owner == account
    }
}
