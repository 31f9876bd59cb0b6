//! Policy ledger and credit computation
//!
//! Policies are kept in insertion order under the digest of
//! (airline, flight code). Settling a key credits every policy on it and
//! clears the list in the same step, so a repeated settlement finds nothing
//! left to pay.

use std::collections::BTreeMap;

use flightsure_common::{AccountId, InsurancePolicy, KeyDigest, LedgerError, PolicyKey};
use serde::{Deserialize, Serialize};

use crate::ledger::credits::CreditLedger;

/// Outcome of crediting one policy key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settlement {
    /// Per-policy payouts, in policy insertion order
    pub payouts: Vec<(AccountId, u64)>,
    /// Sum of all payouts
    pub total: u128,
}

impl Settlement {
    pub fn policies(&self) -> usize {
        self.payouts.len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyLedger {
    policies: BTreeMap<KeyDigest, Vec<InsurancePolicy>>,
}

impl PolicyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a policy; returns the number of policies now held under the key
    pub fn purchase(&mut self, key: &PolicyKey, insuree: AccountId, amount: u64) -> usize {
        let list = self.policies.entry(key.digest()).or_default();
        list.push(InsurancePolicy::new(insuree, amount));
        list.len()
    }

    pub fn policies(&self, key: &PolicyKey) -> &[InsurancePolicy] {
        self.policies
            .get(&key.digest())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Credit every policy under `key` by `floor(amount * multiplier / 10)`
    /// and clear the list.
    ///
    /// All payouts are computed against staged balances first; if any
    /// multiplication or addition overflows, neither the credits nor the
    /// policy list are touched.
    pub fn settle(
        &mut self,
        key: &PolicyKey,
        multiplier_tenths: u64,
        credits: &mut CreditLedger,
    ) -> Result<Settlement, LedgerError> {
        let digest = key.digest();
        let policies = match self.policies.get(&digest) {
            Some(list) if !list.is_empty() => list,
            _ => return Ok(Settlement::default()),
        };

        let mut staged = BTreeMap::new();
        let mut settlement = Settlement::default();

        for policy in policies {
            let payout = policy
                .payout(multiplier_tenths)
                .ok_or(LedgerError::ArithmeticOverflow)?;

            staged
                .entry(policy.insuree)
                .or_insert_with(|| credits.stage(&policy.insuree))
                .credit(payout)
                .map_err(|_| LedgerError::ArithmeticOverflow)?;

            settlement.payouts.push((policy.insuree, payout));
            settlement.total += payout as u128;
        }

        credits.commit(staged);
        self.policies.remove(&digest);
        Ok(settlement)
    }

    /// Number of keys with at least one policy
    pub fn open_keys(&self) -> usize {
        self.policies.values().filter(|l| !l.is_empty()).count()
    }
}
