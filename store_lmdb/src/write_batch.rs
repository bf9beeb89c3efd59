//! Write batching: applies a [`WriteBatch`] of store operations inside a
//! single LMDB write transaction.
//!
//! If the batch is dropped without calling [`LmdbWriteBatch::commit`], or any
//! operation fails part-way, the underlying transaction is aborted and none
//! of the operations become visible.

use heed::types::Bytes;
use heed::{Database, RwTxn};
use serde::Serialize;

use ballot_store::{GovernanceStore, StoreError, StoreOp, WriteBatch};

use crate::environment::LmdbEnvironment;
use crate::keys::{ballot_key, candidate_key, election_account_key, id_key};
use crate::meta::CONFIG_KEY;
use crate::LmdbError;

pub(crate) struct LmdbWriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> LmdbWriteBatch<'a> {
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, StoreError> {
        let txn = env.env().write_txn().map_err(LmdbError::from)?;
        Ok(Self { txn, env })
    }

    fn put<T: Serialize>(
        &mut self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        value: &T,
    ) -> Result<(), StoreError> {
        let bytes = bincode::serialize(value).map_err(LmdbError::from)?;
        db.put(&mut self.txn, key, &bytes).map_err(LmdbError::from)?;
        Ok(())
    }

    /// Stage one operation in the open transaction.
    pub(crate) fn apply(&mut self, op: StoreOp) -> Result<(), StoreError> {
        let env = self.env;
        match op {
            StoreOp::PutElection(e) => self.put(env.elections_db, &id_key(e.id), &e),
            StoreOp::PutElectionResult(r) => self.put(env.results_db, &id_key(r.election_id), &r),
            StoreOp::PutCandidate(c) => self.put(
                env.candidates_db,
                &candidate_key(c.election_id, c.candidate_id),
                &c,
            ),
            StoreOp::PutTally(t) => self.put(
                env.tallies_db,
                &candidate_key(t.election_id, t.candidate_id),
                &t,
            ),
            StoreOp::PutVote(v) => {
                self.put(env.votes_db, &election_account_key(v.election_id, &v.voter), &v)
            }
            StoreOp::DeleteVote { election_id, voter } => {
                env.votes_db
                    .delete(&mut self.txn, &election_account_key(election_id, &voter))
                    .map_err(LmdbError::from)?;
                Ok(())
            }
            StoreOp::PutVoter(v) => self.put(env.voters_db, v.account.as_bytes(), &v),
            StoreOp::PutDelegation(d) => self.put(
                env.delegations_db,
                &election_account_key(d.election_id, &d.delegator),
                &d,
            ),
            StoreOp::PutDelegatedPower(p) => self.put(
                env.delegated_power_db,
                &election_account_key(p.election_id, &p.delegate),
                &p,
            ),
            StoreOp::PutProposal(p) => self.put(env.proposals_db, &id_key(p.id), &p),
            StoreOp::PutProposalBallot(b) => self.put(
                env.proposal_ballots_db,
                &ballot_key(b.proposal_id, &b.voter),
                &b,
            ),
            StoreOp::SetCounter(counter, value) => {
                env.meta_db
                    .put(&mut self.txn, counter.key().as_bytes(), &value.to_be_bytes())
                    .map_err(LmdbError::from)?;
                Ok(())
            }
            StoreOp::PutConfig(config) => self.put(env.meta_db, CONFIG_KEY, &config),
        }
    }

    /// Commit all staged operations in one write transaction.
    pub(crate) fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

impl GovernanceStore for LmdbEnvironment {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let ops = batch.len();
        let mut txn = self.write_batch()?;
        for op in batch.into_ops() {
            txn.apply(op)?;
        }
        txn.commit()?;
        tracing::trace!(ops, "batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_store::{Counter, MetaStore, VoteStore, VoterStore};
    use ballot_types::{AccountId, BlockHeight, Vote, Voter};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("failed to open env");
        (dir, env)
    }

    fn voter(name: &str) -> Voter {
        Voter {
            account: AccountId::new(name),
            registered: true,
            registration_height: BlockHeight::new(1),
            voting_power: 10,
            reputation: Voter::INITIAL_REPUTATION,
            total_votes_cast: 0,
        }
    }

    fn vote(name: &str) -> Vote {
        Vote {
            election_id: 3,
            voter: AccountId::new(name),
            candidate_id: 1,
            cast_height: BlockHeight::new(2),
            voting_power: 10,
            is_delegated: false,
            delegators: Vec::new(),
            weight: 1,
            ranked_choices: Vec::new(),
        }
    }

    #[test]
    fn committed_batch_is_readable() {
        let (_dir, env) = temp_env();
        let mut batch = WriteBatch::new();
        batch.put_voter(voter("alice"));
        batch.put_vote(vote("alice"));
        batch.set_counter(Counter::RegisteredVoters, 1);
        env.commit(batch).expect("commit");

        assert_eq!(env.get_voter(&AccountId::new("alice")).unwrap(), Some(voter("alice")));
        assert_eq!(env.get_vote(3, &AccountId::new("alice")).unwrap(), Some(vote("alice")));
        assert_eq!(env.get_counter(Counter::RegisteredVoters).unwrap(), 1);
    }

    #[test]
    fn dropped_batch_does_not_persist() {
        let (_dir, env) = temp_env();
        {
            let mut txn = env.write_batch().expect("write_batch");
            txn.apply(StoreOp::PutVoter(voter("bob"))).expect("apply");
            // dropped here without commit
        }
        assert!(env.get_voter(&AccountId::new("bob")).unwrap().is_none());
    }

    #[test]
    fn delete_vote_removes_row() {
        let (_dir, env) = temp_env();
        let mut batch = WriteBatch::new();
        batch.put_vote(vote("alice"));
        batch.put_vote(vote("bob"));
        env.commit(batch).unwrap();

        let mut batch = WriteBatch::new();
        batch.delete_vote(3, AccountId::new("alice"));
        env.commit(batch).unwrap();

        let votes = env.get_votes(3).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].voter.as_str(), "bob");
    }
}
