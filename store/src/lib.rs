//! Abstract storage traits for the ballot governance engine.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! Reads go through one trait per table. Writes never do: the engine builds a
//! [`WriteBatch`] and hands it to [`GovernanceStore::commit`], which applies
//! every operation in it or none of them.

pub mod batch;
pub mod candidate;
pub mod delegation;
pub mod election;
pub mod error;
pub mod meta;
pub mod proposal;
pub mod vote;
pub mod voter;

pub use batch::{StoreOp, WriteBatch};
pub use candidate::CandidateStore;
pub use delegation::DelegationStore;
pub use election::ElectionStore;
pub use error::StoreError;
pub use meta::{Counter, MetaStore};
pub use proposal::ProposalStore;
pub use vote::VoteStore;
pub use voter::VoterStore;

/// A complete governance store: every table plus the atomic write path.
pub trait GovernanceStore:
    ElectionStore + CandidateStore + VoteStore + VoterStore + DelegationStore + ProposalStore + MetaStore
{
    /// Apply every operation in `batch` as one all-or-nothing unit.
    ///
    /// On error nothing from the batch is visible to subsequent reads.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
