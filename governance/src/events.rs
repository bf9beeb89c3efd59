//! Events emitted after governance mutations commit.

use ballot_types::{AccountId, BlockHeight, CandidateId, ElectionId, ProposalChoice, ProposalId};

/// Governance-level events that observers can subscribe to via the [`EventBus`].
///
/// An event is emitted only after its batch has committed, so observers
/// never see an event for state that does not exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GovernanceEvent {
    ElectionCreated {
        election_id: ElectionId,
        creator: AccountId,
        end_height: BlockHeight,
    },
    VoterRegistered {
        account: AccountId,
        voting_power: u64,
    },
    CandidateAdded {
        election_id: ElectionId,
        candidate_id: CandidateId,
    },
    CandidateEndorsed {
        election_id: ElectionId,
        candidate_id: CandidateId,
        endorser: AccountId,
    },
    VoteCast {
        election_id: ElectionId,
        voter: AccountId,
        candidate_id: CandidateId,
        weight: u64,
    },
    /// An invalid vote was removed and its weight taken off the tally.
    VoteExpired {
        election_id: ElectionId,
        voter: AccountId,
        candidate_id: CandidateId,
        weight: u64,
    },
    DelegationSet {
        election_id: ElectionId,
        delegator: AccountId,
        delegate: AccountId,
        power: u64,
    },
    DelegationRevoked {
        election_id: ElectionId,
        delegator: AccountId,
        delegate: AccountId,
    },
    ProposalCreated {
        proposal_id: ProposalId,
        proposer: AccountId,
    },
    ProposalVoted {
        proposal_id: ProposalId,
        voter: AccountId,
        choice: ProposalChoice,
        power: u64,
    },
    ProposalExecuted {
        proposal_id: ProposalId,
    },
    ElectionFinalized {
        election_id: ElectionId,
        winner: Option<CandidateId>,
        quorum_met: bool,
    },
    ConfigUpdated {
        version: u64,
        parameter: &'static str,
    },
}

/// Synchronous fan-out event bus for governance events.
///
/// Listeners are invoked inline on the calling thread; keep handlers fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&GovernanceEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn every_listener_sees_every_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for _ in 0..2 {
            let seen = Arc::clone(&seen);
            bus.subscribe(Box::new(move |e| seen.lock().unwrap().push(e.clone())));
        }
        bus.emit(&GovernanceEvent::ProposalExecuted { proposal_id: 4 });
        assert_eq!(bus.listener_count(), 2);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
