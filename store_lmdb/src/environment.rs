//! LMDB environment setup.

use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use serde::de::DeserializeOwned;

use ballot_store::StoreError;

use crate::keys::increment_prefix;
use crate::migration::Migrator;
use crate::write_batch::LmdbWriteBatch;
use crate::LmdbError;

/// Default LMDB map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1024 * 1024 * 1024;

/// Every named database in a ballot environment.
pub const DATABASE_NAMES: [&str; 11] = [
    "elections",
    "candidates",
    "votes",
    "delegations",
    "tallies",
    "voters",
    "delegated_power",
    "proposals",
    "proposal_ballots",
    "results",
    "meta",
];

/// Wraps the LMDB environment and all database handles.
///
/// Implements every `ballot-store` trait; writes go through
/// [`GovernanceStore::commit`](ballot_store::GovernanceStore::commit), which
/// applies a whole batch inside one write transaction.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    path: PathBuf,
    pub(crate) elections_db: Database<Bytes, Bytes>,
    pub(crate) candidates_db: Database<Bytes, Bytes>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    pub(crate) delegations_db: Database<Bytes, Bytes>,
    pub(crate) tallies_db: Database<Bytes, Bytes>,
    pub(crate) voters_db: Database<Bytes, Bytes>,
    pub(crate) delegated_power_db: Database<Bytes, Bytes>,
    pub(crate) proposals_db: Database<Bytes, Bytes>,
    pub(crate) proposal_ballots_db: Database<Bytes, Bytes>,
    pub(crate) results_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path`, creating any missing
    /// databases and bringing the schema up to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per process for this path
        // and never mapped twice.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(DATABASE_NAMES.len() as u32)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let mut create = |name: &str| env.create_database::<Bytes, Bytes>(&mut wtxn, Some(name));
        let elections_db = create("elections")?;
        let candidates_db = create("candidates")?;
        let votes_db = create("votes")?;
        let delegations_db = create("delegations")?;
        let tallies_db = create("tallies")?;
        let voters_db = create("voters")?;
        let delegated_power_db = create("delegated_power")?;
        let proposals_db = create("proposals")?;
        let proposal_ballots_db = create("proposal_ballots")?;
        let results_db = create("results")?;
        let meta_db = create("meta")?;
        wtxn.commit()?;

        let environment = Self {
            env: Arc::new(env),
            path: path.to_path_buf(),
            elections_db,
            candidates_db,
            votes_db,
            delegations_db,
            tallies_db,
            voters_db,
            delegated_power_db,
            proposals_db,
            proposal_ballots_db,
            results_db,
            meta_db,
        };
        Migrator::run(&environment)?;
        tracing::info!(path = %path.display(), map_size, "LMDB environment opened");
        Ok(environment)
    }

    /// The underlying heed environment.
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Begin a write batch over a single write transaction.
    pub(crate) fn write_batch(&self) -> Result<LmdbWriteBatch<'_>, StoreError> {
        LmdbWriteBatch::new(self)
    }

    /// Read and decode one value.
    pub(crate) fn get_value<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<T>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match db.get(&rtxn, key).map_err(LmdbError::from)? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    /// Decode every value whose key starts with `prefix`, in key order.
    pub(crate) fn scan_prefix<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        prefix: &[u8],
    ) -> Result<Vec<T>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let upper = increment_prefix(prefix);
        let range = (
            Bound::Included(prefix),
            match upper.as_deref() {
                Some(upper) => Bound::Excluded(upper),
                None => Bound::Unbounded,
            },
        );
        let mut values = Vec::new();
        for entry in db.range(&rtxn, &range).map_err(LmdbError::from)? {
            let (_, bytes) = entry.map_err(LmdbError::from)?;
            values.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(values)
    }
}
