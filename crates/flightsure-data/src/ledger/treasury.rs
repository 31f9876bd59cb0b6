//! Treasury - value held by the ledger
//!
//! Deposits add to the reserve; withdrawals debit it before the payout
//! leaves, and a failed payout refunds it.

use flightsure_common::LedgerError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasury {
    reserve: u64,
    total_deposited: u128,
    total_paid_out: u128,
}

impl Treasury {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&self) -> u64 {
        self.reserve
    }

    pub fn total_deposited(&self) -> u128 {
        self.total_deposited
    }

    pub fn total_paid_out(&self) -> u128 {
        self.total_paid_out
    }

    /// Record received value; returns the new reserve
    pub fn deposit(&mut self, amount: u64) -> Result<u64, LedgerError> {
        self.reserve = self
            .reserve
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.total_deposited += amount as u128;
        Ok(self.reserve)
    }

    pub fn ensure_covers(&self, amount: u64) -> Result<(), LedgerError> {
        if self.reserve < amount {
            return Err(LedgerError::InsufficientReserve {
                required: amount,
                available: self.reserve,
            });
        }
        Ok(())
    }

    /// Take an outgoing payout from the reserve
    pub fn debit(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.ensure_covers(amount)?;
        self.reserve -= amount;
        self.total_paid_out += amount as u128;
        Ok(())
    }

    /// Undo a [`Treasury::debit`] whose payout did not go through
    pub fn refund(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.reserve = self
            .reserve
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.total_paid_out = self.total_paid_out.saturating_sub(amount as u128);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_debit() {
        let mut treasury = Treasury::new();
        assert_eq!(treasury.deposit(2_000_000), Ok(2_000_000));

        treasury.debit(1_500_000).unwrap();
        assert_eq!(treasury.reserve(), 500_000);
        assert_eq!(treasury.total_paid_out(), 1_500_000);
    }

    #[test]
    fn test_debit_beyond_reserve() {
        let mut treasury = Treasury::new();
        treasury.deposit(100).unwrap();

        assert_eq!(
            treasury.debit(150),
            Err(LedgerError::InsufficientReserve {
                required: 150,
                available: 100
            })
        );
        assert_eq!(treasury.reserve(), 100);
    }

    #[test]
    fn test_refund() {
        let mut treasury = Treasury::new();
        treasury.deposit(100).unwrap();
        treasury.debit(60).unwrap();
        treasury.refund(60).unwrap();

        assert_eq!(treasury.reserve(), 100);
        assert_eq!(treasury.total_paid_out(), 0);
    }

    #[test]
    fn test_deposit_overflow() {
        let mut treasury = Treasury::new();
        treasury.deposit(u64::MAX).unwrap();
        assert_eq!(treasury.deposit(1), Err(LedgerError::ArithmeticOverflow));
        assert_eq!(treasury.total_deposited(), u64::MAX as u128);
    }
}
