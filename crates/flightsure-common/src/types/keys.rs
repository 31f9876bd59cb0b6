//! Composite ledger keys
//!
//! Flights, policy lists, and vote records are stored under a digest of an
//! explicit key struct. The digest is BLAKE3 over a canonical encoding:
//!
//! ```text
//! tag(u8) || field || field || ...
//!   account id : 20 raw bytes
//!   string     : u64 big-endian byte length || UTF-8 bytes
//!   integer    : u64 big-endian
//! ```
//!
//! Strings are length-prefixed, so `("AB", "C")` and `("A", "BC")` never
//! collide, and the tag keeps the three key kinds in separate domains.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdentityError;
use crate::types::account::AccountId;

/// Digest size in bytes (BLAKE3 output)
pub const DIGEST_SIZE: usize = 32;

const FLIGHT_KEY_TAG: u8 = 0x01;
const POLICY_KEY_TAG: u8 = 0x02;
const VOTE_KEY_TAG: u8 = 0x03;

/// Stable 32-byte digest of a composite key
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyDigest([u8; DIGEST_SIZE]);

impl KeyDigest {
    #[inline]
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }
}

impl fmt::Display for KeyDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for KeyDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyDigest({})", self)
    }
}

impl FromStr for KeyDigest {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; DIGEST_SIZE];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| IdentityError::InvalidDigest(format!("{}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl Serialize for KeyDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Canonical key encoder
struct KeyEncoder {
    hasher: blake3::Hasher,
}

impl KeyEncoder {
    fn new(tag: u8) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[tag]);
        Self { hasher }
    }

    fn account(mut self, id: &AccountId) -> Self {
        self.hasher.update(id.as_bytes());
        self
    }

    fn string(mut self, s: &str) -> Self {
        self.hasher.update(&(s.len() as u64).to_be_bytes());
        self.hasher.update(s.as_bytes());
        self
    }

    fn integer(mut self, n: u64) -> Self {
        self.hasher.update(&n.to_be_bytes());
        self
    }

    fn finish(self) -> KeyDigest {
        KeyDigest(*self.hasher.finalize().as_bytes())
    }
}

/// Identifies one scheduled flight instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightKey {
    pub airline: AccountId,
    pub flight_code: String,
    pub timestamp: u64,
}

impl FlightKey {
    pub fn new(airline: AccountId, flight_code: impl Into<String>, timestamp: u64) -> Self {
        Self {
            airline,
            flight_code: flight_code.into(),
            timestamp,
        }
    }

    pub fn digest(&self) -> KeyDigest {
        KeyEncoder::new(FLIGHT_KEY_TAG)
            .account(&self.airline)
            .string(&self.flight_code)
            .integer(self.timestamp)
            .finish()
    }
}

/// Aggregates every policy sold against an airline + flight code,
/// across all instances of that flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyKey {
    pub airline: AccountId,
    pub flight_code: String,
}

impl PolicyKey {
    pub fn new(airline: AccountId, flight_code: impl Into<String>) -> Self {
        Self {
            airline,
            flight_code: flight_code.into(),
        }
    }

    pub fn digest(&self) -> KeyDigest {
        KeyEncoder::new(POLICY_KEY_TAG)
            .account(&self.airline)
            .string(&self.flight_code)
            .finish()
    }
}

/// Ordered (voter, votee) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteKey {
    pub voter: AccountId,
    pub votee: AccountId,
}

impl VoteKey {
    pub fn new(voter: AccountId, votee: AccountId) -> Self {
        Self { voter, votee }
    }

    pub fn digest(&self) -> KeyDigest {
        KeyEncoder::new(VOTE_KEY_TAG)
            .account(&self.voter)
            .account(&self.votee)
            .finish()
    }
}
