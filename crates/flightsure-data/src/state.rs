//! Ledger state - every store the facade mutates under one lock

use flightsure_common::{AccountId, LedgerError};
use serde::{Deserialize, Serialize};

use crate::guard::{AuthorizationRegistry, OperationalGate};
use crate::ledger::{CreditLedger, PolicyLedger, Treasury};
use crate::registry::{AirlineRegistry, FlightRegistry};

/// All ledger stores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LedgerState {
    pub gate: OperationalGate,
    pub access: AuthorizationRegistry,
    pub airlines: AirlineRegistry,
    pub flights: FlightRegistry,
    pub policies: PolicyLedger,
    pub credits: CreditLedger,
    pub treasury: Treasury,
}

impl LedgerState {
    pub fn new(owner: AccountId, operational: bool) -> Self {
        Self {
            gate: OperationalGate::new(operational),
            access: AuthorizationRegistry::new(owner),
            airlines: AirlineRegistry::new(),
            flights: FlightRegistry::new(),
            policies: PolicyLedger::new(),
            credits: CreditLedger::new(),
            treasury: Treasury::new(),
        }
    }

    /// Authorization first, then the gate, so an unauthorized caller is
    /// told so whatever the gate says.
    pub fn require_gated(&self, caller: &AccountId) -> Result<(), LedgerError> {
        self.access.require_authorized(caller)?;
        self.gate.require_open()
    }
}
