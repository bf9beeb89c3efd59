//! CLI configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use ballot_store_lmdb::DEFAULT_MAP_SIZE;
use ballot_types::{AccountId, GovernanceConfig};
use ballot_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("invalid owner account: {0}")]
    Owner(String),
}

/// Settings for the `ballot` binary.
///
/// The governance fields seed the genesis [`GovernanceConfig`] of a fresh
/// data directory only. Once a store exists its persisted record wins, and
/// changes go through the owner-only configuration commands.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Genesis owner account.
    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default = "default_vote_expiry_period")]
    pub vote_expiry_period: u64,

    #[serde(default = "default_minimum_voting_power")]
    pub minimum_voting_power: u64,

    /// Fixed eligible-voter count; unset means "number of registered voters".
    #[serde(default)]
    pub eligible_voters: Option<u64>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./ballot_data")
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_owner() -> String {
    "owner".to_string()
}

fn default_vote_expiry_period() -> u64 {
    GovernanceConfig::DEFAULT_VOTE_EXPIRY_PERIOD
}

fn default_minimum_voting_power() -> u64 {
    GovernanceConfig::DEFAULT_MINIMUM_VOTING_POWER
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The configuration record written to a fresh store.
    pub fn genesis(&self) -> Result<GovernanceConfig, ConfigError> {
        let owner: AccountId = self
            .owner
            .parse()
            .map_err(|e: ballot_types::TypesError| ConfigError::Owner(e.to_string()))?;
        if self.vote_expiry_period == 0 {
            return Err(ConfigError::Parse("vote_expiry_period must be positive".into()));
        }
        Ok(GovernanceConfig {
            vote_expiry_period: self.vote_expiry_period,
            minimum_voting_power: self.minimum_voting_power,
            eligible_voters: self.eligible_voters,
            ..GovernanceConfig::genesis(owner)
        })
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            owner: default_owner(),
            vote_expiry_period: default_vote_expiry_period(),
            minimum_voting_power: default_minimum_voting_power(),
            eligible_voters: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
