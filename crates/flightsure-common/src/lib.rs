//! # FlightSure Common
//!
//! Shared types and errors for the FlightSure flight-insurance ledger.
//!
//! ## Core Types
//!
//! - [`AccountId`]: 20-byte identity for owners, airlines, voters, and insurees
//! - [`FlightKey`] / [`PolicyKey`] / [`VoteKey`]: composite keys with stable BLAKE3 digests
//! - [`Airline`]: pending or registered airline record
//! - [`Flight`]: one scheduled flight instance
//! - [`InsurancePolicy`]: an insuree's cover against an airline + flight code
//! - [`CreditBalance`]: withdrawable credit owed to an insuree
//!
//! ## Errors
//!
//! - [`LedgerError`]: typed precondition failures of ledger operations
//! - [`FlightSureError`]: crate-wide umbrella error

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{FlightSureError, IdentityError, LedgerError, Result};
pub use types::{
    account::AccountId,
    airline::Airline,
    credit::{CreditBalance, CreditError},
    flight::{Flight, STATUS_CODE_LATE_AIRLINE},
    keys::{FlightKey, KeyDigest, PolicyKey, VoteKey},
    policy::InsurancePolicy,
};

/// FlightSure version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Credit multipliers are expressed in tenths (15 => 1.5x)
pub const MULTIPLIER_SCALE: u64 = 10;
