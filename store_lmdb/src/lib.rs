//! LMDB storage backend for the ballot governance engine.
//!
//! Implements all storage traits from `ballot-store` using the `heed` LMDB
//! bindings. Each table maps to one named database within a single
//! environment, and a committed batch is one LMDB write transaction.

pub mod candidate;
pub mod delegation;
pub mod election;
pub mod environment;
pub mod error;
pub mod integrity;
mod keys;
pub mod meta;
pub mod migration;
pub mod proposal;
pub mod vote;
pub mod voter;
mod write_batch;

pub use environment::{LmdbEnvironment, DATABASE_NAMES, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
