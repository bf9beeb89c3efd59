//! Candidate registry.

use ballot_store::{GovernanceStore, WriteBatch};
use ballot_types::{Candidate, CandidateId, CandidateTally, ElectionId};

use crate::elections::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use crate::engine::{check_len, ensure_open, require_owner};
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::votes::ABSTAIN_CANDIDATE;
use crate::{CallContext, GovernanceEngine};

impl<S: GovernanceStore> GovernanceEngine<S> {
    /// Add a candidate to an open election.
    ///
    /// Only the configured owner may add candidates. Ids are chosen by the
    /// owner and must be unique within the election; id 0 is reserved for
    /// abstentions.
    pub fn add_candidate(
        &mut self,
        ctx: &CallContext,
        election_id: ElectionId,
        candidate_id: CandidateId,
        name: impl Into<String>,
        description: impl Into<String>,
        content_hash: Option<[u8; 32]>,
    ) -> Result<Candidate, GovernanceError> {
        let mut election = self.load_election(election_id)?;
        let config = self.config()?;
        require_owner(&config, &ctx.caller)?;
        ensure_open(&election, ctx.height)?;

        let (name, description) = (name.into(), description.into());
        check_len("name", &name, MAX_NAME_LEN)?;
        check_len("description", &description, MAX_DESCRIPTION_LEN)?;
        if candidate_id == ABSTAIN_CANDIDATE {
            return Err(GovernanceError::InvalidCandidate(candidate_id));
        }
        if self.store.get_candidate(election_id, candidate_id)?.is_some() {
            return Err(GovernanceError::CandidateExists {
                election_id,
                candidate_id,
            });
        }

        let candidate = Candidate {
            election_id,
            candidate_id,
            name,
            description,
            content_hash,
            active: true,
            campaign_fund: 0,
            endorsement_count: 0,
        };
        election.candidate_count += 1;

        let mut batch = WriteBatch::new();
        batch.put_candidate(candidate.clone());
        batch.put_tally(CandidateTally::zeroed(election_id, candidate_id));
        batch.put_election(election);
        self.commit(
            batch,
            vec![GovernanceEvent::CandidateAdded {
                election_id,
                candidate_id,
            }],
        )?;
        tracing::info!(election_id, candidate_id, "candidate added");
        Ok(candidate)
    }

    /// Endorse a candidate. Open to any registered voter while the election is open.
    pub fn endorse_candidate(
        &mut self,
        ctx: &CallContext,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<Candidate, GovernanceError> {
        let election = self.load_election(election_id)?;
        ensure_open(&election, ctx.height)?;
        let mut candidate = self
            .store
            .get_candidate(election_id, candidate_id)?
            .filter(|c| c.active)
            .ok_or(GovernanceError::InvalidCandidate(candidate_id))?;
        match self.store.get_voter(&ctx.caller)? {
            Some(voter) if voter.registered => {}
            _ => return Err(GovernanceError::NotEligible(ctx.caller.clone())),
        }

        candidate.endorsement_count = candidate.endorsement_count.saturating_add(1);
        let mut batch = WriteBatch::new();
        batch.put_candidate(candidate.clone());
        self.commit(
            batch,
            vec![GovernanceEvent::CandidateEndorsed {
                election_id,
                candidate_id,
                endorser: ctx.caller.clone(),
            }],
        )?;
        tracing::debug!(election_id, candidate_id, endorser = %ctx.caller, "candidate endorsed");
        Ok(candidate)
    }

    pub fn get_candidate(
        &self,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<Option<Candidate>, GovernanceError> {
        Ok(self.store.get_candidate(election_id, candidate_id)?)
    }

    /// Current tally of a candidate.
    pub fn get_candidate_vote_count(
        &self,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<Option<CandidateTally>, GovernanceError> {
        Ok(self.store.get_tally(election_id, candidate_id)?)
    }
}
