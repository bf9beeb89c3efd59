//! Vote records.

use serde::{Deserialize, Serialize};

use crate::{AccountId, BlockHeight, CandidateId, ElectionId};

/// Maximum length of a ranked-choice list.
pub const MAX_RANKED_CHOICES: usize = 10;

/// A live vote, keyed by `(election_id, voter)`.
///
/// Never updated in place: it is created by a cast and removed only once
/// it has become invalid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub election_id: ElectionId,
    pub voter: AccountId,
    pub candidate_id: CandidateId,
    pub cast_height: BlockHeight,
    /// Effective voting power at cast time.
    pub voting_power: u64,
    /// Whether the cast carried power delegated by other accounts.
    pub is_delegated: bool,
    /// Accounts whose delegated power the cast carried.
    pub delegators: Vec<AccountId>,
    /// Amount added to the candidate's weighted tally.
    pub weight: u64,
    /// Preference order for ranked elections, first choice first.
    pub ranked_choices: Vec<CandidateId>,
}

impl Vote {
    /// Preference order used by instant runoff.
    ///
    /// A vote without an explicit ranking ranks only its chosen candidate.
    pub fn preferences(&self) -> Vec<CandidateId> {
        if self.ranked_choices.is_empty() {
            vec![self.candidate_id]
        } else {
            self.ranked_choices.clone()
        }
    }
}
