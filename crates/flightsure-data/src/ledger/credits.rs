//! Credit ledger - per-insuree withdrawable balances

use std::collections::BTreeMap;

use flightsure_common::{AccountId, CreditBalance, CreditError, LedgerError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditLedger {
    balances: BTreeMap<AccountId, CreditBalance>,
}

impl CreditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, insuree: &AccountId) -> u64 {
        self.balances
            .get(insuree)
            .map(|b| b.available)
            .unwrap_or(0)
    }

    /// Working copy of an insuree's balance for staged updates
    pub fn stage(&self, insuree: &AccountId) -> CreditBalance {
        self.balances
            .get(insuree)
            .cloned()
            .unwrap_or_else(|| CreditBalance::new(*insuree))
    }

    /// Install staged balances produced by [`CreditLedger::stage`]
    pub fn commit(&mut self, staged: BTreeMap<AccountId, CreditBalance>) {
        self.balances.extend(staged);
    }

    /// Zero an insuree's balance, returning the amount it held
    pub fn drain(&mut self, insuree: &AccountId) -> Result<u64, LedgerError> {
        let balance = self
            .balances
            .get_mut(insuree)
            .ok_or(LedgerError::InsufficientCredits { insuree: *insuree })?;

        balance.drain().map_err(|e| match e {
            CreditError::Empty => LedgerError::InsufficientCredits { insuree: *insuree },
            CreditError::Overflow { .. } => LedgerError::ArithmeticOverflow,
        })
    }

    /// Put back an amount taken by [`CreditLedger::drain`]
    pub fn restore(&mut self, insuree: &AccountId, amount: u64) -> Result<(), LedgerError> {
        self.balances
            .entry(*insuree)
            .or_insert_with(|| CreditBalance::new(*insuree))
            .credit(amount)
            .map_err(|_| LedgerError::ArithmeticOverflow)
    }

    /// Sum of all outstanding credit
    pub fn outstanding(&self) -> u128 {
        self.balances.values().map(|b| b.available as u128).sum()
    }
}
