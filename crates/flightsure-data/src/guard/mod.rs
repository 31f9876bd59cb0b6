//! Entry guards
//!
//! Every ledger operation passes through these before touching state:
//! - [`AuthorizationRegistry`]: owner and authorized-caller checks
//! - [`OperationalGate`]: process-wide kill switch

pub mod authorization;
pub mod gate;

pub use authorization::AuthorizationRegistry;
pub use gate::OperationalGate;
