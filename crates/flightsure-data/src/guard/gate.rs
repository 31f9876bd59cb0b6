//! Operational gate - process-wide kill switch

use flightsure_common::LedgerError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Boolean switch consulted by every operation except its own toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalGate {
    operational: bool,
}

impl OperationalGate {
    pub fn new(operational: bool) -> Self {
        Self { operational }
    }

    pub fn is_open(&self) -> bool {
        self.operational
    }

    /// Set the gate; unconditional on the current value so a closed
    /// gate can always be reopened.
    pub fn set(&mut self, operational: bool) {
        self.operational = operational;
    }

    pub fn require_open(&self) -> Result<(), LedgerError> {
        if !self.operational {
            warn!("Rejected call: ledger is not operational");
            return Err(LedgerError::NotOperational);
        }
        Ok(())
    }
}

impl Default for OperationalGate {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_open() {
        let gate = OperationalGate::default();
        assert!(gate.is_open());
        assert!(gate.require_open().is_ok());
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let mut gate = OperationalGate::default();
        gate.set(false);
        gate.set(false);
        assert_eq!(gate.require_open(), Err(LedgerError::NotOperational));

        gate.set(true);
        gate.set(true);
        assert!(gate.is_open());
    }
}
