//! Governance proposals: creation, ballots and execution.
//!
//! A proposal collects for/against/abstain power until its voting end, then
//! waits `execution_delay` blocks before anyone may execute it. Execution
//! succeeds only if the for-share of decisive votes reaches `min_approval`.
//!
//! Each account holds at most one ballot per proposal, and the power it puts
//! behind that ballot may not exceed its registered voting power.

use ballot_store::{Counter, GovernanceStore, WriteBatch};
use ballot_types::{AccountId, Proposal, ProposalBallot, ProposalChoice, ProposalId, ProposalKind};

use crate::elections::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use crate::engine::check_len;
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::{CallContext, GovernanceEngine};

/// Arguments to [`GovernanceEngine::create_proposal`].
#[derive(Clone, Debug)]
pub struct ProposalParams {
    pub title: String,
    pub description: String,
    /// Proposal kind code, 1..=4 (see [`ProposalKind`]).
    pub kind: u8,
    /// Blocks during which ballots are accepted.
    pub voting_duration: u64,
    /// Blocks between the end of voting and the earliest execution.
    pub execution_delay: u64,
    /// Required for-share of decisive votes, in percent.
    pub min_approval: u8,
}

impl<S: GovernanceStore> GovernanceEngine<S> {
    pub fn create_proposal(
        &mut self,
        ctx: &CallContext,
        params: ProposalParams,
    ) -> Result<ProposalId, GovernanceError> {
        let kind = ProposalKind::try_from(params.kind)
            .map_err(|_| GovernanceError::InvalidProposalType(params.kind))?;
        let voting_end_height = ctx.height.saturating_add(params.voting_duration);
        if params.voting_duration == 0 || voting_end_height <= ctx.height {
            return Err(GovernanceError::InvalidDuration);
        }
        if params.min_approval > 100 {
            return Err(GovernanceError::InvalidQuorum(params.min_approval));
        }
        check_len("title", &params.title, MAX_NAME_LEN)?;
        check_len("description", &params.description, MAX_DESCRIPTION_LEN)?;

        let id = self.store.get_counter(Counter::ProposalCount)? + 1;
        let proposal = Proposal {
            id,
            title: params.title,
            description: params.description,
            proposer: ctx.caller.clone(),
            kind,
            execution_delay: params.execution_delay,
            min_approval: params.min_approval,
            created_height: ctx.height,
            voting_end_height,
            executed: false,
            votes_for: 0,
            votes_against: 0,
            votes_abstain: 0,
        };

        let mut batch = WriteBatch::new();
        batch.put_proposal(proposal);
        batch.set_counter(Counter::ProposalCount, id);
        self.commit(
            batch,
            vec![GovernanceEvent::ProposalCreated {
                proposal_id: id,
                proposer: ctx.caller.clone(),
            }],
        )?;
        tracing::info!(proposal_id = id, proposer = %ctx.caller, kind = ?kind, %voting_end_height, "proposal created");
        Ok(id)
    }

    /// Record the caller's ballot. `choice` is 0 for, 1 against, 2 abstain.
    pub fn vote_on_proposal(
        &mut self,
        ctx: &CallContext,
        proposal_id: ProposalId,
        choice: u8,
        voting_power: u64,
    ) -> Result<Proposal, GovernanceError> {
        let mut proposal = self.load_proposal(proposal_id)?;
        if ctx.height >= proposal.voting_end_height {
            return Err(GovernanceError::ProposalEnded(proposal_id));
        }
        let choice =
            ProposalChoice::try_from(choice).map_err(|_| GovernanceError::InvalidChoice(choice))?;
        if voting_power == 0 {
            return Err(GovernanceError::ZeroVotingPower);
        }
        let available = self.get_voter_power(&ctx.caller)?;
        if voting_power > available {
            return Err(GovernanceError::ExcessVotingPower {
                supplied: voting_power,
                available,
            });
        }
        if self
            .store
            .get_proposal_ballot(proposal_id, &ctx.caller)?
            .is_some()
        {
            return Err(GovernanceError::AlreadyVoted {
                voter: ctx.caller.clone(),
            });
        }

        proposal.record(choice, voting_power);
        let ballot = ProposalBallot {
            proposal_id,
            voter: ctx.caller.clone(),
            choice,
            power: voting_power,
            cast_height: ctx.height,
        };

        let mut batch = WriteBatch::new();
        batch.put_proposal(proposal.clone());
        batch.put_proposal_ballot(ballot);
        self.commit(
            batch,
            vec![GovernanceEvent::ProposalVoted {
                proposal_id,
                voter: ctx.caller.clone(),
                choice,
                power: voting_power,
            }],
        )?;
        tracing::info!(proposal_id, voter = %ctx.caller, ?choice, power = voting_power, "proposal ballot cast");
        Ok(proposal)
    }

    /// Execute an approved proposal once its delay has passed. Anyone may call.
    pub fn execute_proposal(
        &mut self,
        ctx: &CallContext,
        proposal_id: ProposalId,
    ) -> Result<Proposal, GovernanceError> {
        let mut proposal = self.load_proposal(proposal_id)?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(proposal_id));
        }
        if ctx.height < proposal.voting_end_height {
            return Err(GovernanceError::ProposalStillVoting(proposal_id));
        }
        let executable_at = proposal.executable_at();
        if ctx.height < executable_at {
            return Err(GovernanceError::ExecutionDelayPending {
                proposal_id,
                executable_at,
            });
        }
        if !proposal.is_approved() {
            return Err(GovernanceError::ProposalRejected(proposal_id));
        }

        proposal.executed = true;
        let mut batch = WriteBatch::new();
        batch.put_proposal(proposal.clone());
        self.commit(batch, vec![GovernanceEvent::ProposalExecuted { proposal_id }])?;
        tracing::info!(
            proposal_id,
            executor = %ctx.caller,
            votes_for = proposal.votes_for,
            votes_against = proposal.votes_against,
            "proposal executed"
        );
        Ok(proposal)
    }

    pub fn get_proposal_info(
        &self,
        proposal_id: ProposalId,
    ) -> Result<Option<Proposal>, GovernanceError> {
        Ok(self.store.get_proposal(proposal_id)?)
    }

    pub fn get_proposal_ballot(
        &self,
        proposal_id: ProposalId,
        voter: &AccountId,
    ) -> Result<Option<ProposalBallot>, GovernanceError> {
        Ok(self.store.get_proposal_ballot(proposal_id, voter)?)
    }

    fn load_proposal(&self, id: ProposalId) -> Result<Proposal, GovernanceError> {
        self.store
            .get_proposal(id)?
            .ok_or(GovernanceError::ProposalNotFound(id))
    }
}
