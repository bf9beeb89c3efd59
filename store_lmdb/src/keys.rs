//! Binary key layout.
//!
//! Integer components are big-endian so LMDB's lexicographic order matches
//! numeric order, and every per-election table starts with the 8-byte
//! election id so one election's rows form a contiguous prefix range.
//!
//! | database          | key                                  |
//! |-------------------|--------------------------------------|
//! | `elections`       | `election_be`                        |
//! | `results`         | `election_be`                        |
//! | `candidates`      | `election_be ++ candidate_be`        |
//! | `tallies`         | `election_be ++ candidate_be`        |
//! | `votes`           | `election_be ++ voter`               |
//! | `delegations`     | `election_be ++ delegator`           |
//! | `delegated_power` | `election_be ++ delegate`            |
//! | `voters`          | `account`                            |
//! | `proposals`       | `proposal_be`                        |
//! | `proposal_ballots`| `proposal_be ++ voter`               |
//! | `meta`            | UTF-8 name                           |

use ballot_types::{AccountId, CandidateId, ElectionId, ProposalId};

pub(crate) fn id_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

pub(crate) fn candidate_key(election: ElectionId, candidate: CandidateId) -> [u8; 12] {
    let mut key = [0u8; 12];
    key[..8].copy_from_slice(&election.to_be_bytes());
    key[8..].copy_from_slice(&candidate.to_be_bytes());
    key
}

/// `election_be ++ account`: votes, delegations and delegated power.
pub(crate) fn election_account_key(election: ElectionId, account: &AccountId) -> Vec<u8> {
    let bytes = account.as_bytes();
    let mut key = Vec::with_capacity(8 + bytes.len());
    key.extend_from_slice(&election.to_be_bytes());
    key.extend_from_slice(bytes);
    key
}

pub(crate) fn ballot_key(proposal: ProposalId, voter: &AccountId) -> Vec<u8> {
    election_account_key(proposal, voter)
}

/// Increment a byte-string prefix to produce the exclusive upper bound for a
/// prefix range scan. Returns `None` if the prefix is all `0xFF` bytes.
pub(crate) fn increment_prefix(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut upper = prefix.to_vec();
    while let Some(last) = upper.last_mut() {
        if *last < 0xFF {
            *last += 1;
            return Some(upper);
        }
        upper.pop();
    }
    None
}
