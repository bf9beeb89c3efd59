//! Fundamental types for the ballot governance engine.
//!
//! This crate defines the records and identifiers shared by every other crate
//! in the workspace: accounts, block heights, elections, candidates, votes,
//! delegations, proposals and the governance configuration record.

pub mod account;
pub mod candidate;
pub mod delegation;
pub mod election;
pub mod error;
pub mod height;
pub mod params;
pub mod proposal;
pub mod vote;
pub mod voter;

pub use account::AccountId;
pub use candidate::{Candidate, CandidateId, CandidateTally};
pub use delegation::{DelegatedPower, Delegation};
pub use election::{Election, ElectionId, ElectionResult, ElectionType};
pub use error::TypesError;
pub use height::BlockHeight;
pub use params::GovernanceConfig;
pub use proposal::{Proposal, ProposalBallot, ProposalChoice, ProposalId, ProposalKind};
pub use vote::{Vote, MAX_RANKED_CHOICES};
pub use voter::Voter;
