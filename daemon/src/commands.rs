//! Subcommands of the `ballot` binary and their dispatch onto the engine.
//!
//! Every command produces a JSON value that `main` prints on stdout. The
//! dispatcher is generic over the store so tests can drive it against the
//! in-memory store.

use anyhow::{anyhow, Context};
use clap::Subcommand;
use serde::Serialize;
use serde_json::{json, Value};

use ballot_governance::{
    CallContext, ElectionParams, GovernanceEngine, ProposalParams, TallyMismatch,
};
use ballot_store::{Counter, GovernanceStore, MetaStore};
use ballot_types::{AccountId, BlockHeight, CandidateId, ElectionId, ProposalId};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    // ── Elections ──────────────────────────────────────────────────────
    /// Create an election that opens at the current height (owner only).
    CreateElection {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// 1 simple, 2 weighted, 3 delegated, 4 proposal, 5 ranked.
        #[arg(long = "type", default_value_t = 1)]
        election_type: u8,
        /// Voting window in blocks.
        #[arg(long)]
        duration: u64,
        /// Quorum in percent of eligible voters.
        #[arg(long, default_value_t = 0)]
        quorum: u8,
        #[arg(long)]
        allow_abstain: bool,
        #[arg(long)]
        require_registration: bool,
    },
    /// Finalize an ended election and store its result (owner only).
    FinalizeElection { election: ElectionId },

    // ── Voters ─────────────────────────────────────────────────────────
    /// Register the caller as a voter.
    RegisterVoter {
        #[arg(long)]
        power: u64,
    },

    // ── Candidates ─────────────────────────────────────────────────────
    AddCandidate {
        election: ElectionId,
        candidate: CandidateId,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Hex-encoded 32-byte content hash.
        #[arg(long)]
        content_hash: Option<String>,
    },
    EndorseCandidate {
        election: ElectionId,
        candidate: CandidateId,
    },

    // ── Voting ─────────────────────────────────────────────────────────
    /// Cast the caller's vote. Candidate 0 abstains.
    CastVote {
        election: ElectionId,
        candidate: CandidateId,
        /// Full preference order for ranked elections, comma-separated.
        #[arg(long, value_delimiter = ',')]
        ranked: Vec<CandidateId>,
    },
    DelegateVote {
        election: ElectionId,
        delegate: AccountId,
    },
    RevokeDelegation { election: ElectionId },

    // ── Expiry ─────────────────────────────────────────────────────────
    /// Remove one voter's vote if it has expired.
    CleanupExpiredVote {
        election: ElectionId,
        voter: AccountId,
    },
    /// Remove every expired vote in an election.
    SweepExpiredVotes { election: ElectionId },

    // ── Proposals ──────────────────────────────────────────────────────
    CreateProposal {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// 1 general, 2 parameter change, 3 funding, 4 constitutional.
        #[arg(long, default_value_t = 1)]
        kind: u8,
        #[arg(long)]
        voting_duration: u64,
        #[arg(long, default_value_t = 0)]
        execution_delay: u64,
        /// Required approval share in percent.
        #[arg(long, default_value_t = 50)]
        min_approval: u8,
    },
    /// Record a ballot: 0 for, 1 against, 2 abstain.
    VoteOnProposal {
        proposal: ProposalId,
        choice: u8,
        #[arg(long)]
        power: u64,
    },
    ExecuteProposal { proposal: ProposalId },

    // ── Configuration (owner only) ─────────────────────────────────────
    Pause,
    Resume,
    SetVoteExpiryPeriod { blocks: u64 },
    SetMinimumVotingPower { power: u64 },
    /// Omit the count to fall back to the registered-voter count.
    SetEligibleVoters { count: Option<u64> },

    // ── Queries ────────────────────────────────────────────────────────
    VoterPower { account: AccountId },
    Voter { account: AccountId },
    EffectivePower {
        election: ElectionId,
        account: AccountId,
    },
    /// Whether a voter's vote is valid at the current height.
    VoteValid {
        election: ElectionId,
        voter: AccountId,
    },
    Election { election: ElectionId },
    Delegation {
        election: ElectionId,
        delegator: AccountId,
    },
    DelegatedPower {
        election: ElectionId,
        delegate: AccountId,
    },
    Vote {
        election: ElectionId,
        voter: AccountId,
    },
    Candidate {
        election: ElectionId,
        candidate: CandidateId,
    },
    CandidateVotes {
        election: ElectionId,
        candidate: CandidateId,
    },
    Results { election: ElectionId },
    Proposal { proposal: ProposalId },
    ProposalBallot {
        proposal: ProposalId,
        voter: AccountId,
    },
    Config,
    /// Recompute tallies from live votes and report any drift.
    VerifyTallies {
        /// Check a single election; all elections when omitted.
        election: Option<ElectionId>,
    },

    /// Check database integrity and tally consistency.
    Check,
}

impl Command {
    /// Whether the command writes to the store.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::CreateElection { .. }
                | Self::FinalizeElection { .. }
                | Self::RegisterVoter { .. }
                | Self::AddCandidate { .. }
                | Self::EndorseCandidate { .. }
                | Self::CastVote { .. }
                | Self::DelegateVote { .. }
                | Self::RevokeDelegation { .. }
                | Self::CleanupExpiredVote { .. }
                | Self::SweepExpiredVotes { .. }
                | Self::CreateProposal { .. }
                | Self::VoteOnProposal { .. }
                | Self::ExecuteProposal { .. }
                | Self::Pause
                | Self::Resume
                | Self::SetVoteExpiryPeriod { .. }
                | Self::SetMinimumVotingPower { .. }
                | Self::SetEligibleVoters { .. }
        )
    }
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<Value> {
    serde_json::to_value(value).context("failed to encode output")
}

fn parse_content_hash(hex_str: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = hex::decode(hex_str).context("content hash is not valid hex")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow!("content hash must be 32 bytes, got {}", b.len()))
}

/// Run `cmd` against `engine` on behalf of `caller` at `height`.
///
/// Mutating commands fail without a caller. `check` is handled by `main`,
/// which owns the LMDB environment.
pub fn execute<S: GovernanceStore>(
    engine: &mut GovernanceEngine<S>,
    caller: Option<&AccountId>,
    height: BlockHeight,
    cmd: Command,
) -> anyhow::Result<Value> {
    let call = caller.map(|caller| CallContext::new(caller.clone(), height));
    let ctx = || call.as_ref().ok_or_else(|| anyhow!("this command requires --caller"));

    let output = match cmd {
        Command::CreateElection {
            name,
            description,
            election_type,
            duration,
            quorum,
            allow_abstain,
            require_registration,
        } => {
            let id = engine.create_election(
                ctx()?,
                ElectionParams {
                    name,
                    description,
                    election_type,
                    duration,
                    quorum,
                    allow_abstain,
                    require_registration,
                },
            )?;
            json!({ "election_id": id })
        }
        Command::FinalizeElection { election } => {
            to_json(&engine.finalize_election(ctx()?, election)?)?
        }
        Command::RegisterVoter { power } => to_json(&engine.register_voter(ctx()?, power)?)?,
        Command::AddCandidate {
            election,
            candidate,
            name,
            description,
            content_hash,
        } => {
            let hash = content_hash.as_deref().map(parse_content_hash).transpose()?;
            to_json(&engine.add_candidate(ctx()?, election, candidate, name, description, hash)?)?
        }
        Command::EndorseCandidate {
            election,
            candidate,
        } => to_json(&engine.endorse_candidate(ctx()?, election, candidate)?)?,
        Command::CastVote {
            election,
            candidate,
            ranked,
        } => {
            let ranked = (!ranked.is_empty()).then_some(ranked);
            to_json(&engine.cast_vote(ctx()?, election, candidate, ranked)?)?
        }
        Command::DelegateVote { election, delegate } => {
            to_json(&engine.delegate_vote(ctx()?, election, &delegate)?)?
        }
        Command::RevokeDelegation { election } => {
            to_json(&engine.revoke_delegation(ctx()?, election)?)?
        }
        Command::CleanupExpiredVote { election, voter } => {
            to_json(&engine.cleanup_expired_vote(ctx()?, election, &voter)?)?
        }
        Command::SweepExpiredVotes { election } => {
            let removed = engine.sweep_expired_votes(ctx()?, election)?;
            json!({ "election_id": election, "removed": removed })
        }
        Command::CreateProposal {
            title,
            description,
            kind,
            voting_duration,
            execution_delay,
            min_approval,
        } => {
            let id = engine.create_proposal(
                ctx()?,
                ProposalParams {
                    title,
                    description,
                    kind,
                    voting_duration,
                    execution_delay,
                    min_approval,
                },
            )?;
            json!({ "proposal_id": id })
        }
        Command::VoteOnProposal {
            proposal,
            choice,
            power,
        } => to_json(&engine.vote_on_proposal(ctx()?, proposal, choice, power)?)?,
        Command::ExecuteProposal { proposal } => {
            to_json(&engine.execute_proposal(ctx()?, proposal)?)?
        }
        Command::Pause => to_json(&engine.set_emergency_pause(ctx()?)?)?,
        Command::Resume => to_json(&engine.resume_operations(ctx()?)?)?,
        Command::SetVoteExpiryPeriod { blocks } => {
            to_json(&engine.set_vote_expiry_period(ctx()?, blocks)?)?
        }
        Command::SetMinimumVotingPower { power } => {
            to_json(&engine.set_minimum_voting_power(ctx()?, power)?)?
        }
        Command::SetEligibleVoters { count } => {
            to_json(&engine.set_eligible_voters(ctx()?, count)?)?
        }

        Command::VoterPower { account } => {
            json!({ "account": account, "power": engine.get_voter_power(&account)? })
        }
        Command::Voter { account } => to_json(&engine.get_voter(&account)?)?,
        Command::EffectivePower { election, account } => json!({
            "election_id": election,
            "account": account,
            "power": engine.get_effective_voting_power(election, &account)?,
        }),
        Command::VoteValid { election, voter } => json!({
            "election_id": election,
            "voter": voter,
            "valid": engine.is_vote_valid(election, &voter, height)?,
        }),
        Command::Election { election } => to_json(&engine.get_election_info(election)?)?,
        Command::Delegation {
            election,
            delegator,
        } => to_json(&engine.get_delegation_info(&delegator, election)?)?,
        Command::DelegatedPower { election, delegate } => {
            to_json(&engine.get_delegated_power(&delegate, election)?)?
        }
        Command::Vote { election, voter } => to_json(&engine.get_vote(election, &voter)?)?,
        Command::Candidate {
            election,
            candidate,
        } => to_json(&engine.get_candidate(election, candidate)?)?,
        Command::CandidateVotes {
            election,
            candidate,
        } => to_json(&engine.get_candidate_vote_count(election, candidate)?)?,
        Command::Results { election } => to_json(&engine.get_election_results(election)?)?,
        Command::Proposal { proposal } => to_json(&engine.get_proposal_info(proposal)?)?,
        Command::ProposalBallot { proposal, voter } => {
            to_json(&engine.get_proposal_ballot(proposal, &voter)?)?
        }
        Command::Config => to_json(&engine.config()?)?,
        Command::VerifyTallies { election } => {
            let elections: Vec<ElectionId> = match election {
                Some(id) => vec![id],
                None => (1..=engine.store().get_counter(Counter::ElectionCount)?).collect(),
            };
            to_json(&verify_tallies(engine, &elections)?)?
        }
        Command::Check => return Err(anyhow!("`check` requires an LMDB data directory")),
    };
    Ok(output)
}

/// Tally verification over every election of a store.
#[derive(Debug, Default, Serialize)]
pub struct TallyCheck {
    pub elections_checked: u64,
    pub mismatches: Vec<TallyMismatch>,
}

/// Verify every election's tallies using the store's persisted config.
///
/// A store that was never initialised has nothing to verify and is left
/// without a config record.
pub fn check_tallies<S: GovernanceStore>(store: S) -> anyhow::Result<TallyCheck> {
    let Some(config) = store.get_config()? else {
        tracing::info!("store has no governance config, skipping tally check");
        return Ok(TallyCheck::default());
    };
    let elections = store.get_counter(Counter::ElectionCount)?;
    let engine = GovernanceEngine::open(store, config)?;
    let ids: Vec<ElectionId> = (1..=elections).collect();
    Ok(TallyCheck {
        elections_checked: elections,
        mismatches: verify_tallies(&engine, &ids)?,
    })
}

/// Tally drift across `elections`, as one flat list.
pub fn verify_tallies<S: GovernanceStore>(
    engine: &GovernanceEngine<S>,
    elections: &[ElectionId],
) -> anyhow::Result<Vec<TallyMismatch>> {
    let mut mismatches = Vec::new();
    for &id in elections {
        mismatches.extend(engine.verify_tallies(id)?);
    }
    Ok(mismatches)
}
