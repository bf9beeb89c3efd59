//! LMDB implementation of MetaStore.
//!
//! Counters are stored as big-endian `u64` under their [`Counter::key`], the
//! configuration record as bincode under `config`, and the schema version as
//! a little-endian `u32`.

use ballot_store::{Counter, MetaStore, StoreError};
use ballot_types::GovernanceConfig;

use crate::{LmdbEnvironment, LmdbError};

pub(crate) const CONFIG_KEY: &[u8] = b"config";
const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

impl MetaStore for LmdbEnvironment {
    fn get_counter(&self, counter: Counter) -> Result<u64, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, counter.key().as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                    StoreError::Corruption(format!("counter '{}' has unexpected length", counter.key()))
                })?;
                Ok(u64::from_be_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn get_config(&self) -> Result<Option<GovernanceConfig>, StoreError> {
        self.get_value(self.meta_db, CONFIG_KEY)
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, SCHEMA_VERSION_KEY)
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization("schema_version has unexpected byte length".to_string())
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        let bytes = version.to_le_bytes();
        let mut wtxn = self.env().write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, SCHEMA_VERSION_KEY, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
