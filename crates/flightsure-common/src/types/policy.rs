//! InsurancePolicy - an insuree's cover against an airline + flight code

use serde::{Deserialize, Serialize};

use crate::types::account::AccountId;
use crate::MULTIPLIER_SCALE;

/// Insurance policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePolicy {
    /// Insured passenger
    pub insuree: AccountId,

    /// Amount insured, in the smallest currency unit
    pub amount: u64,
}

impl InsurancePolicy {
    pub fn new(insuree: AccountId, amount: u64) -> Self {
        Self { insuree, amount }
    }

    /// Payout for a multiplier expressed in tenths: `floor(amount * m / 10)`.
    ///
    /// Returns `None` when the intermediate product overflows.
    ///
    /// # Example
    /// ```
    /// use flightsure_common::{AccountId, InsurancePolicy};
    ///
    /// let policy = InsurancePolicy::new(AccountId::from_label("x"), 1_000_000);
    /// assert_eq!(policy.payout(15), Some(1_500_000));
    /// ```
    pub fn payout(&self, multiplier_tenths: u64) -> Option<u64> {
        self.amount
            .checked_mul(multiplier_tenths)
            .map(|scaled| scaled / MULTIPLIER_SCALE)
    }
}
