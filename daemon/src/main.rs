//! `ballot`: command-line front end for the governance engine.
//!
//! Each invocation opens the LMDB store, runs one command as `--caller` at
//! `--height`, prints the result as JSON and exits.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::json;

use ballot_governance::GovernanceEngine;
use ballot_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use ballot_types::{AccountId, BlockHeight};
use ballot_utils::{init_logging, LogFormat};

use commands::Command;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "ballot", about = "On-chain style governance and voting engine")]
struct Cli {
    /// Data directory for the LMDB store.
    /// When a config file is provided, defaults to the file's value.
    #[arg(long, env = "BALLOT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Account the command runs as.
    #[arg(long, env = "BALLOT_CALLER")]
    caller: Option<AccountId>,

    /// Current block height supplied by the host.
    #[arg(long, default_value_t = 0, env = "BALLOT_HEIGHT")]
    height: u64,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(config.log_format, &config.log_level)?;
    if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    check_data_dir(&config.data_dir).map_err(anyhow::Error::msg)?;
    let env = LmdbEnvironment::open(&config.data_dir, config.map_size)
        .with_context(|| format!("failed to open store at {}", config.data_dir.display()))?;

    let output = if let Command::Check = cli.command {
        run_check(env)?
    } else {
        let mut engine = GovernanceEngine::open(env, config.genesis()?)?;
        let height = BlockHeight::new(cli.height);
        let span = tracing::info_span!(
            "command",
            height = cli.height,
            mutating = cli.command.is_mutating()
        );
        let _guard = span.enter();
        commands::execute(&mut engine, cli.caller.as_ref(), height, cli.command)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Structural integrity of every database plus tally consistency of every
/// election. Fails when either check finds a problem. Never writes to the
/// store, so a fresh data directory stays uninitialised.
fn run_check(env: LmdbEnvironment) -> anyhow::Result<serde_json::Value> {
    let report = check_integrity(&env)?;
    let tallies = commands::check_tallies(env)?;

    let healthy = report.is_healthy() && tallies.mismatches.is_empty();
    if healthy {
        tracing::info!(
            databases = report.databases_checked,
            entries = report.total_entries,
            elections = tallies.elections_checked,
            "store is healthy"
        );
    } else {
        tracing::warn!(
            errors = report.errors.len(),
            mismatches = tallies.mismatches.len(),
            "store check found problems"
        );
    }
    let output = json!({
        "healthy": healthy,
        "integrity": report,
        "elections_checked": tallies.elections_checked,
        "tally_mismatches": tallies.mismatches,
    });
    if !healthy {
        println!("{}", serde_json::to_string_pretty(&output)?);
        anyhow::bail!("store check failed");
    }
    Ok(output)
}
