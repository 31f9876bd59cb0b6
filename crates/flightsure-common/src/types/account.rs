//! AccountId - 20-byte identity for every ledger participant
//!
//! The same identity type names the contract owner, airlines, voters,
//! and insurees. Textual form is `0x` followed by 40 lowercase hex digits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdentityError;

/// Account identity length in bytes
pub const ACCOUNT_ID_LEN: usize = 20;

/// Identity of a ledger participant
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// The all-zero identity
    pub const ZERO: AccountId = AccountId([0u8; ACCOUNT_ID_LEN]);

    pub const fn new(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic identity from a human-readable label.
    ///
    /// Takes the first 20 bytes of the BLAKE3 hash of the label.
    ///
    /// # Example
    /// ```
    /// use flightsure_common::AccountId;
    ///
    /// let a = AccountId::from_label("delta");
    /// assert_eq!(a, AccountId::from_label("delta"));
    /// assert_ne!(a, AccountId::from_label("united"));
    /// ```
    pub fn from_label(label: &str) -> Self {
        let hash = blake3::hash(label.as_bytes());
        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        bytes.copy_from_slice(&hash.as_bytes()[..ACCOUNT_ID_LEN]);
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ACCOUNT_ID_LEN]
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self)
    }
}

impl FromStr for AccountId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| IdentityError::InvalidAccountId(format!("{}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ACCOUNT_ID_LEN]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_roundtrip() {
        let id = AccountId::from_label("insuree-1");
        let text = id.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 2 + ACCOUNT_ID_LEN * 2);
        assert_eq!(text.parse::<AccountId>().unwrap(), id);
    }

    #[test]
    fn test_parse_without_prefix() {
        let id: AccountId = "00000000000000000000000000000000000000ff".parse().unwrap();
        assert_eq!(id.as_bytes()[19], 0xff);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("0x1234".parse::<AccountId>().is_err());
        assert!("0xzz00000000000000000000000000000000000000"
            .parse::<AccountId>()
            .is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let id = AccountId::from_label("owner");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_zero() {
        assert!(AccountId::ZERO.is_zero());
        assert!(!AccountId::from_label("x").is_zero());
    }
}
