//! Money-moving ledgers
//!
//! - [`PolicyLedger`]: insurance policies per (airline, flight code) and payout settlement
//! - [`CreditLedger`]: withdrawable insuree balances
//! - [`Treasury`]: value held by the ledger
//! - [`FundsTransfer`]: outbound payout rail used by withdrawals

pub mod credits;
pub mod payouts;
pub mod policies;
pub mod treasury;

pub use credits::CreditLedger;
pub use payouts::{FundsTransfer, Payout, PayoutLog, TransferError};
pub use policies::{PolicyLedger, Settlement};
pub use treasury::Treasury;
