//! Flight - one scheduled instance of an airline's flight code

use serde::{Deserialize, Serialize};

use crate::types::account::AccountId;
use crate::types::keys::FlightKey;

/// Status sentinel meaning "late, airline at fault"
pub const STATUS_CODE_LATE_AIRLINE: u8 = 0;

/// Flight record, stored under the digest of its [`FlightKey`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_code: String,
    pub is_registered: bool,
    pub status_code: u8,
    pub updated_timestamp: u64,
    pub airline: AccountId,
}

impl Flight {
    /// Freshly registered flight, status initialised to the late-airline sentinel
    pub fn registered(key: &FlightKey) -> Self {
        Self {
            flight_code: key.flight_code.clone(),
            is_registered: true,
            status_code: STATUS_CODE_LATE_AIRLINE,
            updated_timestamp: key.timestamp,
            airline: key.airline,
        }
    }

    pub fn key(&self) -> FlightKey {
        FlightKey::new(self.airline, self.flight_code.clone(), self.updated_timestamp)
    }
}
