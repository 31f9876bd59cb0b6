//! Ledger notifications
//!
//! Events are published on a broadcast channel while the operation's
//! critical section is still held, so subscribers observe them in commit
//! order. Rejected calls publish nothing.

use flightsure_common::AccountId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

/// State changes announced by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A pending airline record was created
    AirlineAdded { airline: AccountId, name: String },
    /// The operational gate was set
    OperatingStatusChanged { operational: bool },
    /// An airline's registration was finalized
    AirlineRegistered { airline: AccountId },
    /// A vote was recorded
    VoteRecorded {
        voter: AccountId,
        votee: AccountId,
        votes: u64,
    },
    /// Policies under an airline + flight code were credited and cleared
    InsureesCredited {
        airline: AccountId,
        flight_code: String,
        policies: usize,
        total: u128,
    },
    /// An insuree's credit left the ledger
    CreditsWithdrawn { insuree: AccountId, amount: u64 },
    /// Value was deposited into the treasury
    DepositReceived { from: AccountId, amount: u64 },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::AirlineAdded { .. } => "airline_added",
            LedgerEvent::OperatingStatusChanged { .. } => "operating_status_changed",
            LedgerEvent::AirlineRegistered { .. } => "airline_registered",
            LedgerEvent::VoteRecorded { .. } => "vote_recorded",
            LedgerEvent::InsureesCredited { .. } => "insurees_credited",
            LedgerEvent::CreditsWithdrawn { .. } => "credits_withdrawn",
            LedgerEvent::DepositReceived { .. } => "deposit_received",
        }
    }
}

/// Event with delivery metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: Uuid,
    /// Unix milliseconds
    pub timestamp: i64,
    pub event: LedgerEvent,
}

/// Broadcast fan-out for ledger events
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EventRecord>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: LedgerEvent) {
        let record = EventRecord {
            event_id: Uuid::now_v7(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            event,
        };
        // No subscribers is fine
        if self.tx.send(record).is_err() {
            trace!("Ledger event dropped: no subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let airline = AccountId::from_label("delta");

        bus.publish(LedgerEvent::AirlineAdded {
            airline,
            name: "Delta".to_string(),
        });

        let record = rx.recv().await.unwrap();
        assert_eq!(record.event.name(), "airline_added");
        assert_eq!(
            record.event,
            LedgerEvent::AirlineAdded {
                airline,
                name: "Delta".to_string()
            }
        );
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        bus.publish(LedgerEvent::OperatingStatusChanged { operational: false });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_record_json_shape() {
        let record = EventRecord {
            event_id: Uuid::now_v7(),
            timestamp: 0,
            event: LedgerEvent::CreditsWithdrawn {
                insuree: AccountId::from_label("x"),
                amount: 10,
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["event"]["type"], "credits_withdrawn");
        assert_eq!(json["event"]["data"]["amount"], 10);
    }
}
