//! Election records and the closed set of election types.

use serde::{Deserialize, Serialize};

use crate::{AccountId, BlockHeight, CandidateId, TypesError};

/// Sequential election identifier, assigned from 1 upwards.
pub type ElectionId = u64;

/// The five election types.
///
/// Every computation that depends on the type (vote weight, winner
/// resolution) matches on this enum exhaustively, so adding a variant forces
/// every dependent computation to be revisited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectionType {
    /// One account, one vote.
    Simple,
    /// Votes weighted by the voter's effective voting power.
    Weighted,
    /// Voters may delegate their power to another account.
    Delegated,
    /// A yes/no style poll expressed through candidates.
    Proposal,
    /// Voters submit a ranking; resolved by instant runoff.
    Ranked,
}

impl ElectionType {
    /// Wire/CLI code of this type.
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Simple => 1,
            Self::Weighted => 2,
            Self::Delegated => 3,
            Self::Proposal => 4,
            Self::Ranked => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Weighted => "weighted",
            Self::Delegated => "delegated",
            Self::Proposal => "proposal",
            Self::Ranked => "ranked",
        }
    }

    /// Contribution of one cast vote to a candidate's weighted tally.
    ///
    /// Only weighted elections count voting power; every other type counts
    /// each vote as exactly 1 regardless of the voter's power.
    pub fn vote_weight(&self, voting_power: u64) -> u64 {
        match self {
            Self::Weighted => voting_power,
            Self::Simple | Self::Delegated | Self::Proposal | Self::Ranked => 1,
        }
    }

    /// Whether voters may hand their power to a delegate.
    pub fn allows_delegation(&self) -> bool {
        match self {
            Self::Delegated => true,
            Self::Simple | Self::Weighted | Self::Proposal | Self::Ranked => false,
        }
    }

    /// Whether votes may carry a ranked-choice list.
    pub fn accepts_rankings(&self) -> bool {
        match self {
            Self::Ranked => true,
            Self::Simple | Self::Weighted | Self::Delegated | Self::Proposal => false,
        }
    }
}

impl TryFrom<u8> for ElectionType {
    type Error = TypesError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Simple),
            2 => Ok(Self::Weighted),
            3 => Ok(Self::Delegated),
            4 => Ok(Self::Proposal),
            5 => Ok(Self::Ranked),
            other => Err(TypesError::UnknownElectionType(other)),
        }
    }
}

/// A bounded-duration poll over a set of candidates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub id: ElectionId,
    pub name: String,
    pub description: String,
    pub election_type: ElectionType,
    /// Cleared exactly once, at finalization.
    pub active: bool,
    pub start_height: BlockHeight,
    /// Always strictly greater than `start_height`.
    pub end_height: BlockHeight,
    /// Required participation, percent of eligible voters (0..=100).
    pub quorum_required: u8,
    pub creator: AccountId,
    pub candidate_count: u32,
    pub allow_abstain: bool,
    pub require_registration: bool,
}

impl Election {
    /// Whether `now` is at or past the end boundary.
    pub fn has_ended(&self, now: BlockHeight) -> bool {
        now >= self.end_height
    }

    /// Whether a height lies within `[start_height, end_height]`.
    pub fn spans(&self, height: BlockHeight) -> bool {
        height >= self.start_height && height <= self.end_height
    }
}

/// Frozen outcome of a finalized election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResult {
    pub election_id: ElectionId,
    pub winner: Option<CandidateId>,
    pub total_votes: u64,
    pub turnout_percent: u64,
    pub quorum_met: bool,
    pub finalized: bool,
    pub finalized_at: BlockHeight,
}
