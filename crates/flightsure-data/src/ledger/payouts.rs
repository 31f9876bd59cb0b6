//! Outbound payout rail
//!
//! Withdrawals hand the drained amount to a [`FundsTransfer`] after the
//! ledger lock is released. Implementations may call back into the ledger;
//! by then the insuree's balance already reads zero.

use flightsure_common::AccountId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Payout rail failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Recipient {0} rejected the transfer")]
    Rejected(AccountId),

    #[error("Payout rail unavailable: {0}")]
    Unavailable(String),
}

/// Sends funds out of the ledger
pub trait FundsTransfer: Send + Sync {
    fn transfer(&self, to: &AccountId, amount: u64) -> Result<(), TransferError>;
}

/// A completed payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: AccountId,
    pub amount: u64,
    pub timestamp: i64,
}

/// In-process rail that records every payout and always succeeds
#[derive(Debug, Default)]
pub struct PayoutLog {
    payouts: Mutex<Vec<Payout>>,
}

impl PayoutLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payouts(&self) -> Vec<Payout> {
        self.payouts.lock().clone()
    }

    /// Total paid to one recipient
    pub fn paid_to(&self, to: &AccountId) -> u128 {
        self.payouts
            .lock()
            .iter()
            .filter(|p| p.to == *to)
            .map(|p| p.amount as u128)
            .sum()
    }
}

impl FundsTransfer for PayoutLog {
    fn transfer(&self, to: &AccountId, amount: u64) -> Result<(), TransferError> {
        info!(to = %to, amount = amount, "Payout sent");
        self.payouts.lock().push(Payout {
            to: *to,
            amount,
            timestamp: chrono::Utc::now().timestamp_millis(),
        });
        Ok(())
    }
}
