//! Nullable infrastructure for deterministic testing.
//!
//! The host supplies heights and storage to the governance engine. This crate
//! provides test-friendly stand-ins that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap the LMDB store and the host clock for nullables in tests.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullStore;
