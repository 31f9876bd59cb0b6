//! Ledger snapshots
//!
//! A snapshot is the complete ledger state in deterministic order, as JSON.
//! Restoring it yields a ledger that answers every query identically.

use std::path::Path;

use flightsure_common::{AccountId, FlightSureError, Result};
use serde::{Deserialize, Serialize};

use crate::state::LedgerState;

/// Bumped whenever the snapshot layout changes
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub format_version: u32,
    /// Unix milliseconds
    pub taken_at: i64,
    state: LedgerState,
}

impl LedgerSnapshot {
    pub(crate) fn capture(state: &LedgerState) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            taken_at: chrono::Utc::now().timestamp_millis(),
            state: state.clone(),
        }
    }

    pub(crate) fn into_state(self) -> Result<LedgerState> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(FlightSureError::Serialization(format!(
                "unsupported snapshot format {} (expected {})",
                self.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }
        Ok(self.state)
    }

    pub fn owner(&self) -> AccountId {
        self.state.access.owner()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
