//! CreditBalance - withdrawable credit owed to an insuree
//!
//! Credits accumulate when delayed-flight policies pay out and are drained
//! in full by a withdrawal. Key characteristics:
//! - Additive crediting with overflow checks
//! - All-or-nothing withdrawal (no partial amounts)
//! - Version field bumped on every change

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::account::AccountId;

/// Credit balance operation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreditError {
    #[error("Credit would overflow: balance {balance}, amount {amount}")]
    Overflow { balance: u64, amount: u64 },

    #[error("No credits to withdraw")]
    Empty,
}

/// Per-insuree credit balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBalance {
    /// Insuree owning the credit
    pub insuree: AccountId,

    /// Withdrawable amount, in the smallest currency unit
    pub available: u64,

    /// Incremented on every credit or drain
    pub version: u64,
}

impl CreditBalance {
    /// Create an empty balance
    pub fn new(insuree: AccountId) -> Self {
        Self {
            insuree,
            available: 0,
            version: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    /// Add credit
    pub fn credit(&mut self, amount: u64) -> Result<(), CreditError> {
        self.available = self
            .available
            .checked_add(amount)
            .ok_or(CreditError::Overflow {
                balance: self.available,
                amount,
            })?;
        self.touch();
        Ok(())
    }

    /// Zero the balance, returning what it held
    pub fn drain(&mut self) -> Result<u64, CreditError> {
        if self.available == 0 {
            return Err(CreditError::Empty);
        }

        let amount = self.available;
        self.available = 0;
        self.touch();
        Ok(amount)
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl std::fmt::Display for CreditBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CreditBalance({}, available={})", self.insuree, self.available)
    }
}
