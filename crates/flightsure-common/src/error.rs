//! Error types for the FlightSure ledger
//!
//! Provides the typed ledger precondition taxonomy plus a crate-wide umbrella error

use thiserror::Error;

use crate::types::account::AccountId;

/// Result type alias using FlightSureError
pub type Result<T> = std::result::Result<T, FlightSureError>;

/// Unified error type for FlightSure operations
#[derive(Debug, Error)]
pub enum FlightSureError {
    // Ledger precondition failures
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    // Identity errors
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Precondition failures of ledger operations.
///
/// Every ledger operation that returns one of these has left the ledger
/// exactly as it found it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Caller {caller} is not authorized")]
    Unauthorized { caller: AccountId },

    #[error("Caller {caller} is not the contract owner")]
    NotOwner { caller: AccountId },

    #[error("Ledger is not operational")]
    NotOperational,

    #[error("No credits available for insuree {insuree}")]
    InsufficientCredits { insuree: AccountId },

    #[error("Arithmetic overflow while updating balances")]
    ArithmeticOverflow,

    #[error("Airline {airline} has not been added")]
    UnknownAirline { airline: AccountId },

    #[error("Insufficient reserve: required {required}, available {available}")]
    InsufficientReserve { required: u64, available: u64 },

    #[error("Funds transfer failed: {0}")]
    TransferFailed(String),
}

/// Identity parsing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("Invalid key digest: {0}")]
    InvalidDigest(String),
}

impl From<serde_json::Error> for FlightSureError {
    fn from(err: serde_json::Error) -> Self {
        FlightSureError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for FlightSureError {
    fn from(err: std::io::Error) -> Self {
        FlightSureError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for FlightSureError {
    fn from(err: anyhow::Error) -> Self {
        FlightSureError::Internal(err.to_string())
    }
}
