//! Flight registry
//!
//! Pure bookkeeping: flights are stored under the digest of
//! (airline, flight code, timestamp). Whether the airline exists is not
//! checked here. Writing an identical triple again replaces the record.

use std::collections::BTreeMap;

use flightsure_common::{Flight, FlightKey, KeyDigest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightRegistry {
    flights: BTreeMap<KeyDigest, Flight>,
}

impl FlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a freshly registered flight; last write wins.
    ///
    /// Returns `true` when an existing record was overwritten.
    pub fn register(&mut self, key: &FlightKey) -> bool {
        self.flights
            .insert(key.digest(), Flight::registered(key))
            .is_some()
    }

    pub fn get(&self, key: &FlightKey) -> Option<&Flight> {
        self.flights.get(&key.digest())
    }

    pub fn is_registered(&self, key: &FlightKey) -> bool {
        self.get(key).is_some_and(|f| f.is_registered)
    }

    pub fn count(&self) -> usize {
        self.flights.len()
    }
}
