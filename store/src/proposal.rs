//! Proposal storage trait.

use crate::StoreError;
use ballot_types::{AccountId, Proposal, ProposalBallot, ProposalId};

pub trait ProposalStore {
    fn get_proposal(&self, id: ProposalId) -> Result<Option<Proposal>, StoreError>;

    /// The ballot `voter` cast on a proposal, if any.
    fn get_proposal_ballot(
        &self,
        id: ProposalId,
        voter: &AccountId,
    ) -> Result<Option<ProposalBallot>, StoreError>;
}
