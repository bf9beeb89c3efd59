//! Per-call context supplied by the host.

use ballot_types::{AccountId, BlockHeight};

/// Who is calling and at which height.
///
/// The host authenticates the caller and supplies a height that never
/// decreases between calls; the engine trusts both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: AccountId,
    pub height: BlockHeight,
}

impl CallContext {
    pub fn new(caller: AccountId, height: BlockHeight) -> Self {
        Self { caller, height }
    }
}
