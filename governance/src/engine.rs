//! Core governance engine: owns the store and the event bus.
//!
//! The engine is split across modules by component: each of `elections`,
//! `voters`, `candidates`, `delegation`, `votes`, `expiry`, `finalization`,
//! `proposal` and `params` adds its operations to [`GovernanceEngine`] in its
//! own `impl` block. Shared plumbing lives here.
//!
//! Every mutating operation follows the same shape: read what it needs,
//! validate everything, record the writes in a [`WriteBatch`], then
//! [`commit`](GovernanceEngine::commit) once. Nothing is written before
//! validation finishes, so a failed call leaves no trace.

use ballot_store::{GovernanceStore, StoreError, WriteBatch};
use ballot_types::{AccountId, BlockHeight, Election, ElectionId, GovernanceConfig};

use crate::error::GovernanceError;
use crate::events::{EventBus, GovernanceEvent};

pub struct GovernanceEngine<S: GovernanceStore> {
    pub(crate) store: S,
    events: EventBus,
}

impl<S: GovernanceStore> GovernanceEngine<S> {
    /// Open an engine over `store`.
    ///
    /// A fresh store is initialised with `genesis`; a store that already
    /// holds a configuration keeps it and `genesis` is ignored.
    pub fn open(store: S, genesis: GovernanceConfig) -> Result<Self, GovernanceError> {
        match store.get_config()? {
            Some(existing) => {
                tracing::info!(
                    version = existing.version,
                    owner = %existing.owner,
                    "reusing persisted governance config"
                );
            }
            None => {
                tracing::info!(owner = %genesis.owner, "initialising governance store");
                let mut batch = WriteBatch::new();
                batch.put_config(genesis);
                store.commit(batch)?;
            }
        }
        Ok(Self {
            store,
            events: EventBus::new(),
        })
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a listener for events emitted after each commit.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// The current configuration record, read from the store on every call.
    pub fn config(&self) -> Result<GovernanceConfig, GovernanceError> {
        self.store
            .get_config()?
            .ok_or_else(|| StoreError::NotFound("governance config".to_string()).into())
    }

    /// Look up an election by id.
    pub fn get_election_info(&self, id: ElectionId) -> Result<Option<Election>, GovernanceError> {
        Ok(self.store.get_election(id)?)
    }

    pub(crate) fn load_election(&self, id: ElectionId) -> Result<Election, GovernanceError> {
        self.store
            .get_election(id)?
            .ok_or(GovernanceError::ElectionNotFound(id))
    }

    /// Commit `batch` and, once it is durable, emit `events`.
    pub(crate) fn commit(
        &self,
        batch: WriteBatch,
        events: Vec<GovernanceEvent>,
    ) -> Result<(), GovernanceError> {
        self.store.commit(batch)?;
        for event in &events {
            self.events.emit(event);
        }
        Ok(())
    }
}

pub(crate) fn require_owner(
    config: &GovernanceConfig,
    caller: &AccountId,
) -> Result<(), GovernanceError> {
    if config.is_owner(caller) {
        Ok(())
    } else {
        Err(GovernanceError::Unauthorized(caller.clone()))
    }
}

/// Whether the election accepts votes, candidates and delegations at `now`.
pub(crate) fn ensure_open(election: &Election, now: BlockHeight) -> Result<(), GovernanceError> {
    if !election.active {
        return Err(GovernanceError::ElectionInactive(election.id));
    }
    if election.has_ended(now) {
        return Err(GovernanceError::ElectionEnded {
            election_id: election.id,
            end_height: election.end_height,
        });
    }
    Ok(())
}

pub(crate) fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), GovernanceError> {
    if value.len() > max {
        Err(GovernanceError::FieldTooLong { field, max })
    } else {
        Ok(())
    }
}
