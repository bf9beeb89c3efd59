//! Voter registry.

use ballot_store::{Counter, GovernanceStore, WriteBatch};
use ballot_types::{AccountId, Voter};

use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::{CallContext, GovernanceEngine};

/// Voting power of an account that never registered.
pub const UNREGISTERED_POWER: u64 = 1;

impl<S: GovernanceStore> GovernanceEngine<S> {
    /// Register the caller with a fixed voting power.
    ///
    /// Registration is permanent: there is no update path afterwards.
    pub fn register_voter(
        &mut self,
        ctx: &CallContext,
        voting_power: u64,
    ) -> Result<Voter, GovernanceError> {
        let config = self.config()?;
        if config.paused {
            return Err(GovernanceError::SystemPaused);
        }
        let minimum = config.minimum_voting_power.max(1);
        if voting_power < minimum {
            return Err(GovernanceError::InsufficientPower {
                provided: voting_power,
                minimum,
            });
        }
        if self.store.get_voter(&ctx.caller)?.is_some() {
            return Err(GovernanceError::AlreadyRegistered(ctx.caller.clone()));
        }

        let voter = Voter {
            account: ctx.caller.clone(),
            registered: true,
            registration_height: ctx.height,
            voting_power,
            reputation: Voter::INITIAL_REPUTATION,
            total_votes_cast: 0,
        };
        let registered = self.store.get_counter(Counter::RegisteredVoters)?;

        let mut batch = WriteBatch::new();
        batch.put_voter(voter.clone());
        batch.set_counter(Counter::RegisteredVoters, registered + 1);
        self.commit(
            batch,
            vec![GovernanceEvent::VoterRegistered {
                account: ctx.caller.clone(),
                voting_power,
            }],
        )?;
        tracing::info!(account = %ctx.caller, voting_power, "voter registered");
        Ok(voter)
    }

    pub fn get_voter(&self, account: &AccountId) -> Result<Option<Voter>, GovernanceError> {
        Ok(self.store.get_voter(account)?)
    }

    /// Base voting power: the registered power, or 1 for unregistered accounts.
    pub fn get_voter_power(&self, account: &AccountId) -> Result<u64, GovernanceError> {
        Ok(match self.store.get_voter(account)? {
            Some(voter) if voter.registered => voter.voting_power,
            _ => UNREGISTERED_POWER,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{account, ctx, engine, OWNER};
    use ballot_store::MetaStore;

    #[test]
    fn unregistered_accounts_default_to_one() {
        let engine = engine();
        assert_eq!(engine.get_voter_power(&account("nobody")).unwrap(), 1);
    }

    #[test]
    fn registration_records_power_and_counts() {
        let mut engine = engine();
        let voter = engine.register_voter(&ctx("alice", 3), 40).unwrap();
        assert_eq!(voter.total_votes_cast, 0);
        assert_eq!(engine.get_voter_power(&account("alice")).unwrap(), 40);
        assert_eq!(
            engine.store().get_counter(Counter::RegisteredVoters).unwrap(),
            1
        );
    }

    #[test]
    fn below_minimum_rejected() {
        let mut engine = engine();
        engine.set_minimum_voting_power(&ctx(OWNER, 1), 10).unwrap();
        let err = engine.register_voter(&ctx("alice", 2), 9).unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InsufficientPower { provided: 9, minimum: 10 }
        ));
        assert!(engine.get_voter(&account("alice")).unwrap().is_none());
    }

    #[test]
    fn zero_power_rejected_even_with_zero_minimum() {
        let mut engine = engine();
        assert!(matches!(
            engine.register_voter(&ctx("alice", 1), 0),
            Err(GovernanceError::InsufficientPower { .. })
        ));
    }

    #[test]
    fn second_registration_rejected() {
        let mut engine = engine();
        engine.register_voter(&ctx("alice", 1), 5).unwrap();
        assert!(matches!(
            engine.register_voter(&ctx("alice", 2), 50),
            Err(GovernanceError::AlreadyRegistered(_))
        ));
        assert_eq!(engine.get_voter_power(&account("alice")).unwrap(), 5);
    }

    #[test]
    fn paused_blocks_registration() {
        let mut engine = engine();
        engine.set_emergency_pause(&ctx(OWNER, 1)).unwrap();
        assert!(matches!(
            engine.register_voter(&ctx("alice", 2), 5),
            Err(GovernanceError::SystemPaused)
        ));
    }
}
