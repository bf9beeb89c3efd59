//! Governance proposals, independent of elections.

use serde::{Deserialize, Serialize};

use crate::{AccountId, BlockHeight, TypesError};

/// Sequential proposal identifier, assigned from 1 upwards.
pub type ProposalId = u64;

/// What a proposal is about. Informational only; execution just marks it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalKind {
    General,
    ParameterChange,
    Funding,
    Constitutional,
}

impl ProposalKind {
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::General => 1,
            Self::ParameterChange => 2,
            Self::Funding => 3,
            Self::Constitutional => 4,
        }
    }
}

impl TryFrom<u8> for ProposalKind {
    type Error = TypesError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::General),
            2 => Ok(Self::ParameterChange),
            3 => Ok(Self::Funding),
            4 => Ok(Self::Constitutional),
            other => Err(TypesError::UnknownProposalKind(other)),
        }
    }
}

/// A ballot choice on a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalChoice {
    For,
    Against,
    Abstain,
}

impl TryFrom<u8> for ProposalChoice {
    type Error = TypesError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::For),
            1 => Ok(Self::Against),
            2 => Ok(Self::Abstain),
            other => Err(TypesError::UnknownProposalChoice(other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub description: String,
    pub proposer: AccountId,
    pub kind: ProposalKind,
    /// Blocks that must pass after voting ends before execution.
    pub execution_delay: u64,
    /// Minimum share of for-votes among for+against, percent (0..=100).
    pub min_approval: u8,
    pub created_height: BlockHeight,
    pub voting_end_height: BlockHeight,
    pub executed: bool,
    pub votes_for: u64,
    pub votes_against: u64,
    pub votes_abstain: u64,
}

impl Proposal {
    /// Add `power` to the bucket for `choice`.
    pub fn record(&mut self, choice: ProposalChoice, power: u64) {
        let bucket = match choice {
            ProposalChoice::For => &mut self.votes_for,
            ProposalChoice::Against => &mut self.votes_against,
            ProposalChoice::Abstain => &mut self.votes_abstain,
        };
        *bucket = bucket.saturating_add(power);
    }

    /// Whether the for-share of decisive votes meets `min_approval`.
    ///
    /// A proposal with no decisive (for/against) votes is never approved.
    pub fn is_approved(&self) -> bool {
        let decisive = self.votes_for as u128 + self.votes_against as u128;
        if decisive == 0 {
            return false;
        }
        self.votes_for as u128 * 100 >= self.min_approval as u128 * decisive
    }

    /// First height at which the proposal may be executed.
    pub fn executable_at(&self) -> BlockHeight {
        self.voting_end_height.saturating_add(self.execution_delay)
    }
}

/// One account's ballot on a proposal, keyed by `(proposal_id, voter)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalBallot {
    pub proposal_id: ProposalId,
    pub voter: AccountId,
    pub choice: ProposalChoice,
    pub power: u64,
    pub cast_height: BlockHeight,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(min_approval: u8) -> Proposal {
        Proposal {
            id: 1,
            title: "raise quorum".into(),
            description: String::new(),
            proposer: AccountId::new("owner"),
            kind: ProposalKind::ParameterChange,
            execution_delay: 5,
            min_approval,
            created_height: BlockHeight::new(0),
            voting_end_height: BlockHeight::new(10),
            executed: false,
            votes_for: 0,
            votes_against: 0,
            votes_abstain: 0,
        }
    }

    #[test]
    fn approval_ignores_abstentions() {
        let mut p = proposal(60);
        p.record(ProposalChoice::For, 6);
        p.record(ProposalChoice::Against, 4);
        p.record(ProposalChoice::Abstain, 100);
        assert!(p.is_approved());

        p.record(ProposalChoice::Against, 1);
        assert!(!p.is_approved());
    }

    #[test]
    fn no_decisive_votes_is_not_approved() {
        let mut p = proposal(0);
        p.record(ProposalChoice::Abstain, 3);
        assert!(!p.is_approved());
    }

    #[test]
    fn executable_after_delay() {
        assert_eq!(proposal(50).executable_at(), BlockHeight::new(15));
    }
}
