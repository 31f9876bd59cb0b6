//! # FlightSure Data
//!
//! Governance and escrow ledger for the FlightSure flight-insurance scheme.
//!
//! ## Components
//!
//! - **Guards**: owner/authorized-caller registry and the operational gate
//! - **Registries**: airlines with consortium voting, scheduled flights
//! - **Ledgers**: insurance policies, insuree credits, treasury and payout rail
//! - **Events**: broadcast notifications of committed state changes
//! - **Snapshots**: JSON export and restore of the whole ledger
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      FlightSureData                         │
//! │        authorization ──▶ operational gate ──▶ operation     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐ │
//! │  │  Airlines   │  │   Policies  │──│      Credits        │ │
//! │  │  (+votes)   │  │             │  │                     │ │
//! │  └─────────────┘  └─────────────┘  └──────────┬──────────┘ │
//! │  ┌─────────────┐                   ┌──────────▼──────────┐ │
//! │  │   Flights   │                   │  Treasury ──▶ rail  │ │
//! │  └─────────────┘                   └─────────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use flightsure_common::AccountId;
//! use flightsure_data::{FlightSureData, LedgerConfig};
//!
//! let owner = AccountId::from_label("owner");
//! let delta = AccountId::from_label("delta");
//! let passenger = AccountId::from_label("passenger");
//!
//! let ledger = FlightSureData::new(owner, LedgerConfig::default());
//! ledger.add_to_insurance_policy(&owner, &delta, "DL100", &passenger, 1_000_000).unwrap();
//! ledger.credit_insurees(&owner, &delta, "DL100", 15).unwrap();
//!
//! assert_eq!(ledger.balance_of(&owner, &passenger).unwrap(), 1_500_000);
//! ```

pub mod config;
pub mod data;
pub mod events;
pub mod guard;
pub mod ledger;
pub mod registry;
pub mod snapshot;
mod state;

pub use config::{LedgerConfig, UnknownAirlines, VoteCounting};
pub use data::{FlightSureData, LedgerSummary};
pub use events::{EventBus, EventRecord, LedgerEvent};
pub use ledger::{FundsTransfer, Payout, PayoutLog, TransferError};
pub use snapshot::{LedgerSnapshot, SNAPSHOT_FORMAT_VERSION};

/// Default capacity of the ledger event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;
