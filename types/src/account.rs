//! Authenticated account identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// An account identifier as supplied by the host's identity provider.
///
/// The engine never authenticates accounts itself; it only compares them.
/// Identifiers are non-empty and at most [`AccountId::MAX_LEN`] bytes so they
/// can be used as the trailing component of binary composite keys.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Maximum identifier length in bytes.
    pub const MAX_LEN: usize = 128;

    /// Create an account identifier from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty or longer than [`AccountId::MAX_LEN`].
    /// Use [`str::parse`] for fallible construction.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(Self::is_well_formed(&s), "account id must be 1..=128 bytes");
        Self(s)
    }

    fn is_well_formed(s: &str) -> bool {
        !s.is_empty() && s.len() <= Self::MAX_LEN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for AccountId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_well_formed(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(TypesError::InvalidAccount(s.to_string()))
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty() {
        assert!("".parse::<AccountId>().is_err());
    }

    #[test]
    fn parse_rejects_oversized() {
        let raw = "a".repeat(AccountId::MAX_LEN + 1);
        assert!(raw.parse::<AccountId>().is_err());
    }

    #[test]
    fn parse_accepts_plain_name() {
        let id: AccountId = "alice".parse().unwrap();
        assert_eq!(id.as_str(), "alice");
        assert_eq!(id.to_string(), "alice");
    }
}
