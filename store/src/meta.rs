//! Metadata storage trait.

use crate::StoreError;
use ballot_types::GovernanceConfig;

/// Scalar counters kept alongside the tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Counter {
    /// Highest election id assigned so far.
    ElectionCount,
    /// Highest proposal id assigned so far.
    ProposalCount,
    /// Number of registered voters.
    RegisteredVoters,
}

impl Counter {
    pub const ALL: [Counter; 3] = [
        Counter::ElectionCount,
        Counter::ProposalCount,
        Counter::RegisteredVoters,
    ];

    /// Meta-table key of this counter.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ElectionCount => "election_count",
            Self::ProposalCount => "proposal_count",
            Self::RegisteredVoters => "registered_voters",
        }
    }
}

/// Trait for database metadata: counters, the configuration record, and
/// the schema version.
pub trait MetaStore {
    /// Current value of a counter; zero if never written.
    fn get_counter(&self, counter: Counter) -> Result<u64, StoreError>;

    /// The configuration record; `None` on a fresh store.
    fn get_config(&self) -> Result<Option<GovernanceConfig>, StoreError>;

    /// Get the current database schema version (0 for a fresh store).
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    /// Set the database schema version.
    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
