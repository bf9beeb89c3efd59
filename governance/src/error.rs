use ballot_store::StoreError;
use ballot_types::{AccountId, BlockHeight, CandidateId, ElectionId, ElectionType, ProposalId};
use thiserror::Error;

/// Coarse classification of governance failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller is not allowed to perform an owner-only operation.
    Authorization,
    /// A referenced election, proposal, delegation or vote does not exist.
    NotFound,
    /// The operation conflicts with current state (already voted, ended, ...).
    StateConflict,
    /// An argument is out of range or malformed.
    Validation,
    /// The caller or a counterparty is not eligible.
    Eligibility,
    /// The emergency pause is active.
    SystemGate,
    /// The storage backend failed.
    Storage,
}

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("{0} is not authorized to perform this operation")]
    Unauthorized(AccountId),

    #[error("election {0} not found")]
    ElectionNotFound(ElectionId),

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("{delegator} has no active delegation in election {election_id}")]
    DelegationNotFound {
        delegator: AccountId,
        election_id: ElectionId,
    },

    #[error("{voter} has already voted")]
    AlreadyVoted { voter: AccountId },

    #[error("{0} is already registered")]
    AlreadyRegistered(AccountId),

    #[error("election {0} is not active")]
    ElectionInactive(ElectionId),

    #[error("election {election_id} ended at {end_height}")]
    ElectionEnded {
        election_id: ElectionId,
        end_height: BlockHeight,
    },

    #[error("election {election_id} has not ended yet (ends at {end_height})")]
    NotYetEnded {
        election_id: ElectionId,
        end_height: BlockHeight,
    },

    #[error("election {0} is already finalized")]
    AlreadyFinalized(ElectionId),

    #[error("candidate {candidate_id} already exists in election {election_id}")]
    CandidateExists {
        election_id: ElectionId,
        candidate_id: CandidateId,
    },

    #[error("proposal {0} voting has ended")]
    ProposalEnded(ProposalId),

    #[error("proposal {0} is still open for voting")]
    ProposalStillVoting(ProposalId),

    #[error("proposal {proposal_id} cannot be executed before {executable_at}")]
    ExecutionDelayPending {
        proposal_id: ProposalId,
        executable_at: BlockHeight,
    },

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("proposal {0} did not reach its approval threshold")]
    ProposalRejected(ProposalId),

    #[error("invalid election type {0}, expected 1..=5")]
    InvalidElectionType(u8),

    #[error("invalid proposal type {0}, expected 1..=4")]
    InvalidProposalType(u8),

    #[error("invalid percentage {0}, expected 0..=100")]
    InvalidQuorum(u8),

    #[error("invalid choice {0}, expected 0 (for), 1 (against) or 2 (abstain)")]
    InvalidChoice(u8),

    #[error("duration must be at least one block")]
    InvalidDuration,

    #[error("{field} exceeds {max} bytes")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("cannot delegate to self")]
    SelfDelegation,

    #[error("effective voting power is zero")]
    ZeroVotingPower,

    #[error("insufficient voting power: {provided} < minimum {minimum}")]
    InsufficientPower { provided: u64, minimum: u64 },

    #[error("supplied voting power {supplied} exceeds available {available}")]
    ExcessVotingPower { supplied: u64, available: u64 },

    #[error("candidate {0} is not standing in this election")]
    InvalidCandidate(CandidateId),

    #[error("invalid ranked choices: {0}")]
    InvalidRankedChoices(String),

    #[error("election type {found:?} does not support this operation, expected {expected:?}")]
    WrongElectionType {
        expected: ElectionType,
        found: ElectionType,
    },

    #[error("vote expiry period must be at least one block")]
    InvalidExpiryPeriod,

    #[error("voting power must be non-zero")]
    InvalidPower,

    #[error("{0} is not eligible to vote in this election")]
    NotEligible(AccountId),

    #[error("{0} is not eligible to receive delegations in this election")]
    DelegateNotEligible(AccountId),

    #[error("{0} holds delegated power in this election and cannot delegate it onwards")]
    HoldsDelegatedPower(AccountId),

    #[error("operations are paused")]
    SystemPaused,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl GovernanceError {
    pub fn category(&self) -> ErrorCategory {
        use GovernanceError::*;
        match self {
            Unauthorized(_) => ErrorCategory::Authorization,
            ElectionNotFound(_) | ProposalNotFound(_) | DelegationNotFound { .. } => {
                ErrorCategory::NotFound
            }
            AlreadyVoted { .. }
            | AlreadyRegistered(_)
            | ElectionInactive(_)
            | ElectionEnded { .. }
            | NotYetEnded { .. }
            | AlreadyFinalized(_)
            | CandidateExists { .. }
            | ProposalEnded(_)
            | ProposalStillVoting(_)
            | ExecutionDelayPending { .. }
            | AlreadyExecuted(_)
            | ProposalRejected(_) => ErrorCategory::StateConflict,
            InvalidElectionType(_)
            | InvalidProposalType(_)
            | InvalidQuorum(_)
            | InvalidChoice(_)
            | InvalidDuration
            | FieldTooLong { .. }
            | SelfDelegation
            | ZeroVotingPower
            | InsufficientPower { .. }
            | ExcessVotingPower { .. }
            | InvalidCandidate(_)
            | InvalidRankedChoices(_)
            | WrongElectionType { .. }
            | InvalidExpiryPeriod
            | InvalidPower => ErrorCategory::Validation,
            NotEligible(_) | DelegateNotEligible(_) | HoldsDelegatedPower(_) => {
                ErrorCategory::Eligibility
            }
            SystemPaused => ErrorCategory::SystemGate,
            Store(_) => ErrorCategory::Storage,
        }
    }
}
