//! Vote delegation: entrust voting power to another account for one election.
//!
//! Each edge `(delegator, election) → delegate` captures the delegator's base
//! power at delegation time. A reverse index `(delegate, election)` keeps the
//! sum of captured power from active incoming edges, so effective power is a
//! single lookup rather than a scan over all delegations.
//!
//! Rules:
//! - Delegation is not transitive: an account holding incoming power cannot
//!   delegate, and an account with an outgoing edge cannot receive.
//! - An account with an active outgoing edge has no effective power in that
//!   election, so its power is never counted twice.
//! - Re-delegating retracts the previous edge's power from the old delegate.

use ballot_store::{GovernanceStore, WriteBatch};
use ballot_types::{AccountId, DelegatedPower, Delegation, ElectionId, ElectionType};

use crate::engine::ensure_open;
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::{CallContext, GovernanceEngine};

impl<S: GovernanceStore> GovernanceEngine<S> {
    /// Delegate the caller's voting power in `election_id` to `delegate`.
    pub fn delegate_vote(
        &mut self,
        ctx: &CallContext,
        election_id: ElectionId,
        delegate: &AccountId,
    ) -> Result<Delegation, GovernanceError> {
        let election = self.load_election(election_id)?;
        if &ctx.caller == delegate {
            return Err(GovernanceError::SelfDelegation);
        }
        ensure_open(&election, ctx.height)?;
        if !election.election_type.allows_delegation() {
            return Err(GovernanceError::WrongElectionType {
                expected: ElectionType::Delegated,
                found: election.election_type,
            });
        }
        if election.require_registration && !self.is_registered(delegate)? {
            return Err(GovernanceError::DelegateNotEligible(delegate.clone()));
        }
        if self
            .store
            .get_delegation(delegate, election_id)?
            .is_some_and(|d| d.active)
        {
            return Err(GovernanceError::DelegateNotEligible(delegate.clone()));
        }
        if self
            .store
            .get_delegated_power(&ctx.caller, election_id)?
            .is_some_and(|p| !p.is_empty())
        {
            return Err(GovernanceError::HoldsDelegatedPower(ctx.caller.clone()));
        }
        if self.store.get_vote(election_id, &ctx.caller)?.is_some() {
            return Err(GovernanceError::AlreadyVoted {
                voter: ctx.caller.clone(),
            });
        }

        let power = self.get_voter_power(&ctx.caller)?;
        let mut batch = WriteBatch::new();

        let mut incoming = self.delegated_power_or_empty(delegate, election_id)?;
        if let Some(previous) = self
            .store
            .get_delegation(&ctx.caller, election_id)?
            .filter(|d| d.active)
        {
            if &previous.delegate == delegate {
                incoming.debit(&ctx.caller, previous.power);
            } else {
                let mut old = self.delegated_power_or_empty(&previous.delegate, election_id)?;
                old.debit(&ctx.caller, previous.power);
                batch.put_delegated_power(old);
                tracing::debug!(
                    election_id,
                    delegator = %ctx.caller,
                    old_delegate = %previous.delegate,
                    "retracting previous delegation"
                );
            }
        }
        incoming.credit(&ctx.caller, power);

        let delegation = Delegation {
            delegator: ctx.caller.clone(),
            election_id,
            delegate: delegate.clone(),
            power,
            active: true,
            delegated_at: ctx.height,
        };
        batch.put_delegated_power(incoming);
        batch.put_delegation(delegation.clone());
        self.commit(
            batch,
            vec![GovernanceEvent::DelegationSet {
                election_id,
                delegator: ctx.caller.clone(),
                delegate: delegate.clone(),
                power,
            }],
        )?;
        tracing::info!(election_id, delegator = %ctx.caller, delegate = %delegate, power, "vote delegated");
        Ok(delegation)
    }

    /// Revoke the caller's active delegation in `election_id`.
    pub fn revoke_delegation(
        &mut self,
        ctx: &CallContext,
        election_id: ElectionId,
    ) -> Result<Delegation, GovernanceError> {
        let election = self.load_election(election_id)?;
        let mut delegation = self
            .store
            .get_delegation(&ctx.caller, election_id)?
            .filter(|d| d.active)
            .ok_or_else(|| GovernanceError::DelegationNotFound {
                delegator: ctx.caller.clone(),
                election_id,
            })?;
        ensure_open(&election, ctx.height)?;

        let mut incoming = self.delegated_power_or_empty(&delegation.delegate, election_id)?;
        incoming.debit(&ctx.caller, delegation.power);
        delegation.active = false;

        let mut batch = WriteBatch::new();
        batch.put_delegated_power(incoming);
        batch.put_delegation(delegation.clone());
        self.commit(
            batch,
            vec![GovernanceEvent::DelegationRevoked {
                election_id,
                delegator: ctx.caller.clone(),
                delegate: delegation.delegate.clone(),
            }],
        )?;
        tracing::info!(election_id, delegator = %ctx.caller, "delegation revoked");
        Ok(delegation)
    }

    /// Base power plus power delegated to `account`, or zero while `account`
    /// itself has an active delegation in the election.
    pub fn get_effective_voting_power(
        &self,
        election_id: ElectionId,
        account: &AccountId,
    ) -> Result<u64, GovernanceError> {
        if self
            .store
            .get_delegation(account, election_id)?
            .is_some_and(|d| d.active)
        {
            return Ok(0);
        }
        let base = self.get_voter_power(account)?;
        let incoming = self
            .store
            .get_delegated_power(account, election_id)?
            .map(|p| p.total_power)
            .unwrap_or(0);
        Ok(base.saturating_add(incoming))
    }

    /// The delegation edge recorded for `delegator`, active or revoked.
    pub fn get_delegation_info(
        &self,
        delegator: &AccountId,
        election_id: ElectionId,
    ) -> Result<Option<Delegation>, GovernanceError> {
        Ok(self.store.get_delegation(delegator, election_id)?)
    }

    /// Power currently delegated to `delegate`.
    pub fn get_delegated_power(
        &self,
        delegate: &AccountId,
        election_id: ElectionId,
    ) -> Result<DelegatedPower, GovernanceError> {
        self.delegated_power_or_empty(delegate, election_id)
    }

    fn delegated_power_or_empty(
        &self,
        delegate: &AccountId,
        election_id: ElectionId,
    ) -> Result<DelegatedPower, GovernanceError> {
        Ok(self
            .store
            .get_delegated_power(delegate, election_id)?
            .unwrap_or_else(|| DelegatedPower::empty(delegate, election_id)))
    }

    pub(crate) fn is_registered(&self, account: &AccountId) -> Result<bool, GovernanceError> {
        Ok(self
            .store
            .get_voter(account)?
            .is_some_and(|v| v.registered))
    }
}
