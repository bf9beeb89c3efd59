//! Write batching: the single write path into a governance store.
//!
//! An operation validates everything first, then records its writes here and
//! hands the batch to [`GovernanceStore::commit`](crate::GovernanceStore::commit).
//! Backends apply a batch inside one transaction, so either every write in it
//! becomes visible or none does.
//!
//! ```ignore
//! let mut batch = WriteBatch::new();
//! batch.put_vote(vote);
//! batch.put_tally(tally);
//! batch.put_voter(voter);
//! store.commit(batch)?;
//! ```

use ballot_types::{
    AccountId, Candidate, CandidateTally, DelegatedPower, Delegation, Election, ElectionId,
    ElectionResult, GovernanceConfig, Proposal, ProposalBallot, Vote, Voter,
};

use crate::meta::Counter;

/// One write against one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreOp {
    PutElection(Election),
    PutElectionResult(ElectionResult),
    PutCandidate(Candidate),
    PutTally(CandidateTally),
    PutVote(Vote),
    DeleteVote {
        election_id: ElectionId,
        voter: AccountId,
    },
    PutVoter(Voter),
    PutDelegation(Delegation),
    PutDelegatedPower(DelegatedPower),
    PutProposal(Proposal),
    PutProposalBallot(ProposalBallot),
    SetCounter(Counter, u64),
    PutConfig(GovernanceConfig),
}

/// An ordered list of writes applied atomically. Later writes to the same key
/// overwrite earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<StoreOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_election(&mut self, election: Election) {
        self.ops.push(StoreOp::PutElection(election));
    }

    pub fn put_election_result(&mut self, result: ElectionResult) {
        self.ops.push(StoreOp::PutElectionResult(result));
    }

    pub fn put_candidate(&mut self, candidate: Candidate) {
        self.ops.push(StoreOp::PutCandidate(candidate));
    }

    pub fn put_tally(&mut self, tally: CandidateTally) {
        self.ops.push(StoreOp::PutTally(tally));
    }

    pub fn put_vote(&mut self, vote: Vote) {
        self.ops.push(StoreOp::PutVote(vote));
    }

    pub fn delete_vote(&mut self, election_id: ElectionId, voter: AccountId) {
        self.ops.push(StoreOp::DeleteVote { election_id, voter });
    }

    pub fn put_voter(&mut self, voter: Voter) {
        self.ops.push(StoreOp::PutVoter(voter));
    }

    pub fn put_delegation(&mut self, delegation: Delegation) {
        self.ops.push(StoreOp::PutDelegation(delegation));
    }

    pub fn put_delegated_power(&mut self, power: DelegatedPower) {
        self.ops.push(StoreOp::PutDelegatedPower(power));
    }

    pub fn put_proposal(&mut self, proposal: Proposal) {
        self.ops.push(StoreOp::PutProposal(proposal));
    }

    pub fn put_proposal_ballot(&mut self, ballot: ProposalBallot) {
        self.ops.push(StoreOp::PutProposalBallot(ballot));
    }

    pub fn set_counter(&mut self, counter: Counter, value: u64) {
        self.ops.push(StoreOp::SetCounter(counter, value));
    }

    pub fn put_config(&mut self, config: GovernanceConfig) {
        self.ops.push(StoreOp::PutConfig(config));
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<StoreOp> {
        self.ops
    }
}
