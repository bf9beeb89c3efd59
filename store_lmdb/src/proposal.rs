//! LMDB implementation of ProposalStore.

use ballot_store::{ProposalStore, StoreError};
use ballot_types::{AccountId, Proposal, ProposalBallot, ProposalId};

use crate::keys::{ballot_key, id_key};
use crate::LmdbEnvironment;

impl ProposalStore for LmdbEnvironment {
    fn get_proposal(&self, id: ProposalId) -> Result<Option<Proposal>, StoreError> {
        self.get_value(self.proposals_db, &id_key(id))
    }

    fn get_proposal_ballot(
        &self,
        id: ProposalId,
        voter: &AccountId,
    ) -> Result<Option<ProposalBallot>, StoreError> {
        self.get_value(self.proposal_ballots_db, &ballot_key(id, voter))
    }
}
