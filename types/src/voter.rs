//! Registered voters.

use serde::{Deserialize, Serialize};

use crate::{AccountId, BlockHeight};

/// A registered voter. Created once; only `total_votes_cast` changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub account: AccountId,
    pub registered: bool,
    pub registration_height: BlockHeight,
    pub voting_power: u64,
    pub reputation: u64,
    pub total_votes_cast: u64,
}

impl Voter {
    /// Reputation every account starts with at registration.
    pub const INITIAL_REPUTATION: u64 = 100;
}
