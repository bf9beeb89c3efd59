//! LMDB database integrity checks.
//!
//! Run before serving commands to detect corruption early: every expected
//! database must open and every stored value must decode.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, RoTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use ballot_types::{
    Candidate, CandidateTally, DelegatedPower, Delegation, Election, ElectionResult, Proposal,
    ProposalBallot, Vote, Voter,
};

use crate::environment::DATABASE_NAMES;
use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug, Default, Serialize)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Count and decode every row of every database. Read failures are recorded
/// in the report rather than causing a hard error.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let rtxn = env.env().read_txn()?;

    for &db_name in DATABASE_NAMES.iter() {
        match env.env().open_database::<Bytes, Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => report.total_entries += count,
                    Err(e) => report
                        .errors
                        .push(format!("failed to read database '{db_name}': {e}")),
                }
            }
            Ok(None) => report.errors.push(format!("database '{db_name}' is missing")),
            Err(e) => report
                .errors
                .push(format!("failed to open database '{db_name}': {e}")),
        }
    }

    decode_all::<Election>(env.elections_db, "elections", &rtxn, &mut report);
    decode_all::<Candidate>(env.candidates_db, "candidates", &rtxn, &mut report);
    decode_all::<Vote>(env.votes_db, "votes", &rtxn, &mut report);
    decode_all::<Delegation>(env.delegations_db, "delegations", &rtxn, &mut report);
    decode_all::<CandidateTally>(env.tallies_db, "tallies", &rtxn, &mut report);
    decode_all::<Voter>(env.voters_db, "voters", &rtxn, &mut report);
    decode_all::<DelegatedPower>(env.delegated_power_db, "delegated_power", &rtxn, &mut report);
    decode_all::<Proposal>(env.proposals_db, "proposals", &rtxn, &mut report);
    decode_all::<ProposalBallot>(env.proposal_ballots_db, "proposal_ballots", &rtxn, &mut report);
    decode_all::<ElectionResult>(env.results_db, "results", &rtxn, &mut report);

    if !report.is_healthy() {
        tracing::warn!(errors = report.errors.len(), "integrity check found problems");
    }
    Ok(report)
}

fn decode_all<T: DeserializeOwned>(
    db: Database<Bytes, Bytes>,
    name: &str,
    rtxn: &RoTxn<'_>,
    report: &mut IntegrityReport,
) {
    let iter = match db.iter(rtxn) {
        Ok(iter) => iter,
        Err(e) => {
            report.errors.push(format!("failed to iterate '{name}': {e}"));
            return;
        }
    };
    for (index, entry) in iter.enumerate() {
        match entry {
            Ok((_, bytes)) => {
                if let Err(e) = bincode::deserialize::<T>(bytes) {
                    report
                        .errors
                        .push(format!("undecodable row {index} in '{name}': {e}"));
                }
            }
            Err(e) => report.errors.push(format!("failed to read '{name}': {e}")),
        }
    }
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent or empty) directory. Returns an
/// error if the directory holds files but `data.mdb` is missing, which
/// suggests corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let is_empty = std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    if is_empty {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_data_dir_fresh_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_data_dir(&dir.path().join("not-yet-created")).is_ok());
        assert!(check_data_dir(dir.path()).is_ok());
        std::fs::write(dir.path().join("stray.txt"), b"x").unwrap();
        assert!(check_data_dir(dir.path()).is_err());
    }

    #[test]
    fn fresh_environment_is_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
        let report = check_integrity(&env).unwrap();
        assert!(report.is_healthy(), "{:?}", report.errors);
        assert_eq!(report.databases_checked, DATABASE_NAMES.len() as u32);
    }

    #[test]
    fn garbage_row_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
        let mut wtxn = env.env().write_txn().unwrap();
        env.votes_db.put(&mut wtxn, b"bad", &[0xFF]).unwrap();
        wtxn.commit().unwrap();

        let report = check_integrity(&env).unwrap();
        assert!(!report.is_healthy());
        assert!(report.errors.iter().any(|e| e.contains("'votes'")));
    }
}
