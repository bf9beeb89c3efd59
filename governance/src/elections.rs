//! Election registry: creation and lookup.
//!
//! Finalization lives in [`crate::finalization`].

use ballot_store::{Counter, GovernanceStore, WriteBatch};
use ballot_types::{ElectionId, ElectionType, Election};

use crate::engine::check_len;
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::{CallContext, GovernanceEngine};

pub const MAX_NAME_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 256;

/// Arguments to [`GovernanceEngine::create_election`].
#[derive(Clone, Debug)]
pub struct ElectionParams {
    pub name: String,
    pub description: String,
    /// Election type code, 1..=5 (see [`ElectionType`]).
    pub election_type: u8,
    /// Length of the voting window in blocks.
    pub duration: u64,
    /// Required participation, percent of eligible voters.
    pub quorum: u8,
    pub allow_abstain: bool,
    pub require_registration: bool,
}

impl<S: GovernanceStore> GovernanceEngine<S> {
    /// Create an election that opens at the current height.
    pub fn create_election(
        &mut self,
        ctx: &CallContext,
        params: ElectionParams,
    ) -> Result<ElectionId, GovernanceError> {
        let config = self.config()?;
        if config.paused {
            return Err(GovernanceError::SystemPaused);
        }
        let election_type = ElectionType::try_from(params.election_type)
            .map_err(|_| GovernanceError::InvalidElectionType(params.election_type))?;
        if params.quorum > 100 {
            return Err(GovernanceError::InvalidQuorum(params.quorum));
        }
        if params.duration == 0 {
            return Err(GovernanceError::InvalidDuration);
        }
        check_len("name", &params.name, MAX_NAME_LEN)?;
        check_len("description", &params.description, MAX_DESCRIPTION_LEN)?;

        let id = self.store.get_counter(Counter::ElectionCount)? + 1;
        let election = Election {
            id,
            name: params.name,
            description: params.description,
            election_type,
            active: true,
            start_height: ctx.height,
            end_height: ctx.height.saturating_add(params.duration),
            quorum_required: params.quorum,
            creator: ctx.caller.clone(),
            candidate_count: 0,
            allow_abstain: params.allow_abstain,
            require_registration: params.require_registration,
        };
        if election.end_height <= election.start_height {
            return Err(GovernanceError::InvalidDuration);
        }

        let event = GovernanceEvent::ElectionCreated {
            election_id: id,
            creator: ctx.caller.clone(),
            end_height: election.end_height,
        };
        tracing::info!(
            election_id = id,
            kind = election_type.name(),
            start = %election.start_height,
            end = %election.end_height,
            "election created"
        );
        let mut batch = WriteBatch::new();
        batch.put_election(election);
        batch.set_counter(Counter::ElectionCount, id);
        self.commit(batch, vec![event])?;
        Ok(id)
    }
}
