//! Governance engine for the ballot workspace.
//!
//! Elections move through created → active → ended → finalized. Voters cast
//! at most one live vote per election; votes expire a configurable number of
//! blocks after they are cast and anyone may clean them up. Tallies are kept
//! incrementally and always equal the sum over live votes.
//!
//! Key principle: every operation validates first and then commits all of
//! its writes as one batch. No operation is ever partially applied.

pub mod candidates;
pub mod context;
pub mod delegation;
pub mod elections;
pub mod engine;
pub mod error;
pub mod events;
pub mod expiry;
pub mod finalization;
pub mod params;
pub mod proposal;
pub mod tally;
pub mod voters;
pub mod votes;

pub use context::CallContext;
pub use elections::ElectionParams;
pub use engine::GovernanceEngine;
pub use error::{ErrorCategory, GovernanceError};
pub use events::{EventBus, GovernanceEvent};
pub use expiry::CleanupOutcome;
pub use params::ConfigUpdate;
pub use proposal::ProposalParams;
pub use tally::TallyMismatch;
pub use votes::ABSTAIN_CANDIDATE;
