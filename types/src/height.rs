//! Logical clock type used for every temporal comparison.
//!
//! Heights are supplied by the host and are monotonically non-decreasing
//! across calls. The engine never reads a wall clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block height on the host's logical clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// Height zero.
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Blocks elapsed since this height (relative to `now`), zero if `now` is earlier.
    pub fn elapsed_since(&self, now: BlockHeight) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// This height advanced by `blocks`, saturating at `u64::MAX`.
    pub fn saturating_add(&self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }

    /// Big-endian bytes, used as an ordered key component.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl From<u64> for BlockHeight {
    fn from(height: u64) -> Self {
        Self(height)
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
