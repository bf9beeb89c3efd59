//! Configuration authority: owner-only updates to the governance config.
//!
//! Every update increments the record's version. Operations read the record
//! by value at call time, so an update applies from the next call on.

use ballot_store::{GovernanceStore, WriteBatch};
use ballot_types::GovernanceConfig;

use crate::engine::require_owner;
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::{CallContext, GovernanceEngine};

/// An update to one governable configuration value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigUpdate {
    /// Engage the emergency pause.
    Pause,
    /// Lift the emergency pause.
    Resume,
    VoteExpiryPeriod(u64),
    MinimumVotingPower(u64),
    /// `None` falls back to the registered-voter count.
    EligibleVoters(Option<u64>),
}

impl ConfigUpdate {
    /// Human-readable name of the parameter this update touches.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pause | Self::Resume => "paused",
            Self::VoteExpiryPeriod(_) => "vote_expiry_period",
            Self::MinimumVotingPower(_) => "minimum_voting_power",
            Self::EligibleVoters(_) => "eligible_voters",
        }
    }

    fn apply(&self, config: &mut GovernanceConfig) -> Result<(), GovernanceError> {
        match *self {
            Self::Pause => config.paused = true,
            Self::Resume => config.paused = false,
            Self::VoteExpiryPeriod(0) => return Err(GovernanceError::InvalidExpiryPeriod),
            Self::VoteExpiryPeriod(blocks) => config.vote_expiry_period = blocks,
            Self::MinimumVotingPower(0) => return Err(GovernanceError::InvalidPower),
            Self::MinimumVotingPower(power) => config.minimum_voting_power = power,
            Self::EligibleVoters(count) => config.eligible_voters = count,
        }
        Ok(())
    }
}

impl<S: GovernanceStore> GovernanceEngine<S> {
    /// Apply one owner-only configuration update.
    pub fn update_config(
        &mut self,
        ctx: &CallContext,
        update: ConfigUpdate,
    ) -> Result<GovernanceConfig, GovernanceError> {
        let mut config = self.config()?;
        require_owner(&config, &ctx.caller)?;
        update.apply(&mut config)?;
        config.version += 1;

        let mut batch = WriteBatch::new();
        batch.put_config(config.clone());
        self.commit(
            batch,
            vec![GovernanceEvent::ConfigUpdated {
                version: config.version,
                parameter: update.name(),
            }],
        )?;
        tracing::info!(
            version = config.version,
            parameter = update.name(),
            "governance config updated"
        );
        Ok(config)
    }

    pub fn set_emergency_pause(&mut self, ctx: &CallContext) -> Result<GovernanceConfig, GovernanceError> {
        tracing::warn!(caller = %ctx.caller, "emergency pause requested");
        self.update_config(ctx, ConfigUpdate::Pause)
    }

    pub fn resume_operations(&mut self, ctx: &CallContext) -> Result<GovernanceConfig, GovernanceError> {
        self.update_config(ctx, ConfigUpdate::Resume)
    }

    pub fn set_vote_expiry_period(
        &mut self,
        ctx: &CallContext,
        blocks: u64,
    ) -> Result<GovernanceConfig, GovernanceError> {
        self.update_config(ctx, ConfigUpdate::VoteExpiryPeriod(blocks))
    }

    pub fn set_minimum_voting_power(
        &mut self,
        ctx: &CallContext,
        power: u64,
    ) -> Result<GovernanceConfig, GovernanceError> {
        self.update_config(ctx, ConfigUpdate::MinimumVotingPower(power))
    }

    pub fn set_eligible_voters(
        &mut self,
        ctx: &CallContext,
        count: Option<u64>,
    ) -> Result<GovernanceConfig, GovernanceError> {
        self.update_config(ctx, ConfigUpdate::EligibleVoters(count))
    }
}
