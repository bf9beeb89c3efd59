//! Conversion errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("unknown election type {0}, expected 1..=5")]
    UnknownElectionType(u8),

    #[error("unknown proposal kind {0}, expected 1..=4")]
    UnknownProposalKind(u8),

    #[error("unknown proposal choice {0}, expected 0 (for), 1 (against) or 2 (abstain)")]
    UnknownProposalChoice(u8),

    #[error("invalid account identifier: {0:?}")]
    InvalidAccount(String),
}
