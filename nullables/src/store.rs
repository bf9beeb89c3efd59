//! Nullable store: thread-safe in-memory storage for testing.

use ballot_store::{
    CandidateStore, Counter, DelegationStore, ElectionStore, GovernanceStore, MetaStore,
    ProposalStore, StoreError, StoreOp, VoteStore, VoterStore, WriteBatch,
};
use ballot_types::{
    AccountId, Candidate, CandidateId, CandidateTally, DelegatedPower, Delegation, Election,
    ElectionId, ElectionResult, GovernanceConfig, Proposal, ProposalBallot, ProposalId, Vote,
    Voter,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Clone, Default)]
struct Tables {
    elections: BTreeMap<ElectionId, Election>,
    results: BTreeMap<ElectionId, ElectionResult>,
    candidates: BTreeMap<(ElectionId, CandidateId), Candidate>,
    tallies: BTreeMap<(ElectionId, CandidateId), CandidateTally>,
    votes: BTreeMap<(ElectionId, AccountId), Vote>,
    voters: HashMap<AccountId, Voter>,
    delegations: HashMap<(AccountId, ElectionId), Delegation>,
    delegated_power: HashMap<(AccountId, ElectionId), DelegatedPower>,
    proposals: BTreeMap<ProposalId, Proposal>,
    ballots: HashMap<(ProposalId, AccountId), ProposalBallot>,
    counters: HashMap<Counter, u64>,
    config: Option<GovernanceConfig>,
    schema_version: u32,
}

impl Tables {
    fn apply(&mut self, op: StoreOp) {
        match op {
            StoreOp::PutElection(e) => {
                self.elections.insert(e.id, e);
            }
            StoreOp::PutElectionResult(r) => {
                self.results.insert(r.election_id, r);
            }
            StoreOp::PutCandidate(c) => {
                self.candidates.insert((c.election_id, c.candidate_id), c);
            }
            StoreOp::PutTally(t) => {
                self.tallies.insert((t.election_id, t.candidate_id), t);
            }
            StoreOp::PutVote(v) => {
                self.votes.insert((v.election_id, v.voter.clone()), v);
            }
            StoreOp::DeleteVote { election_id, voter } => {
                self.votes.remove(&(election_id, voter));
            }
            StoreOp::PutVoter(v) => {
                self.voters.insert(v.account.clone(), v);
            }
            StoreOp::PutDelegation(d) => {
                self.delegations
                    .insert((d.delegator.clone(), d.election_id), d);
            }
            StoreOp::PutDelegatedPower(p) => {
                self.delegated_power
                    .insert((p.delegate.clone(), p.election_id), p);
            }
            StoreOp::PutProposal(p) => {
                self.proposals.insert(p.id, p);
            }
            StoreOp::PutProposalBallot(b) => {
                self.ballots.insert((b.proposal_id, b.voter.clone()), b);
            }
            StoreOp::SetCounter(counter, value) => {
                self.counters.insert(counter, value);
            }
            StoreOp::PutConfig(c) => {
                self.config = Some(c);
            }
        }
    }
}

/// An in-memory governance store for testing.
///
/// All tables sit behind one mutex, so a committed batch becomes visible as
/// a whole. [`NullStore::fail_commits`] makes every commit fail, for tests
/// that check no partial state escapes a failed operation.
pub struct NullStore {
    tables: Mutex<Tables>,
    fail_commits: AtomicBool,
    commits: Mutex<u64>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            fail_commits: AtomicBool::new(false),
            commits: Mutex::new(0),
        }
    }

    /// Make subsequent commits fail with a backend error.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of batches committed so far.
    pub fn commit_count(&self) -> u64 {
        *self.commits.lock().unwrap()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ElectionStore for NullStore {
    fn get_election(&self, id: ElectionId) -> Result<Option<Election>, StoreError> {
        Ok(self.tables.lock().unwrap().elections.get(&id).cloned())
    }

    fn get_election_result(&self, id: ElectionId) -> Result<Option<ElectionResult>, StoreError> {
        Ok(self.tables.lock().unwrap().results.get(&id).cloned())
    }
}

impl CandidateStore for NullStore {
    fn get_candidate(
        &self,
        election: ElectionId,
        candidate: CandidateId,
    ) -> Result<Option<Candidate>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .candidates
            .get(&(election, candidate))
            .cloned())
    }

    fn get_candidates(&self, election: ElectionId) -> Result<Vec<Candidate>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .candidates
            .range((election, CandidateId::MIN)..=(election, CandidateId::MAX))
            .map(|(_, c)| c.clone())
            .collect())
    }

    fn get_tally(
        &self,
        election: ElectionId,
        candidate: CandidateId,
    ) -> Result<Option<CandidateTally>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .tallies
            .get(&(election, candidate))
            .copied())
    }

    fn get_tallies(&self, election: ElectionId) -> Result<Vec<CandidateTally>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .tallies
            .range((election, CandidateId::MIN)..=(election, CandidateId::MAX))
            .map(|(_, t)| *t)
            .collect())
    }
}

impl VoteStore for NullStore {
    fn get_vote(&self, election: ElectionId, voter: &AccountId) -> Result<Option<Vote>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .votes
            .get(&(election, voter.clone()))
            .cloned())
    }

    fn get_votes(&self, election: ElectionId) -> Result<Vec<Vote>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .votes
            .iter()
            .filter(|((e, _), _)| *e == election)
            .map(|(_, v)| v.clone())
            .collect())
    }
}

impl VoterStore for NullStore {
    fn get_voter(&self, account: &AccountId) -> Result<Option<Voter>, StoreError> {
        Ok(self.tables.lock().unwrap().voters.get(account).cloned())
    }
}

impl DelegationStore for NullStore {
    fn get_delegation(
        &self,
        delegator: &AccountId,
        election: ElectionId,
    ) -> Result<Option<Delegation>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .delegations
            .get(&(delegator.clone(), election))
            .cloned())
    }

    fn get_delegated_power(
        &self,
        delegate: &AccountId,
        election: ElectionId,
    ) -> Result<Option<DelegatedPower>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .delegated_power
            .get(&(delegate.clone(), election))
            .cloned())
    }
}

impl ProposalStore for NullStore {
    fn get_proposal(&self, id: ProposalId) -> Result<Option<Proposal>, StoreError> {
        Ok(self.tables.lock().unwrap().proposals.get(&id).cloned())
    }

    fn get_proposal_ballot(
        &self,
        id: ProposalId,
        voter: &AccountId,
    ) -> Result<Option<ProposalBallot>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .ballots
            .get(&(id, voter.clone()))
            .cloned())
    }
}

impl MetaStore for NullStore {
    fn get_counter(&self, counter: Counter) -> Result<u64, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .counters
            .get(&counter)
            .copied()
            .unwrap_or(0))
    }

    fn get_config(&self) -> Result<Option<GovernanceConfig>, StoreError> {
        Ok(self.tables.lock().unwrap().config.clone())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        Ok(self.tables.lock().unwrap().schema_version)
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.tables.lock().unwrap().schema_version = version;
        Ok(())
    }
}

impl GovernanceStore for NullStore {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store commit failure".to_string()));
        }
        let mut tables = self.tables.lock().unwrap();
        for op in batch.into_ops() {
            tables.apply(op);
        }
        *self.commits.lock().unwrap() += 1;
        Ok(())
    }
}
