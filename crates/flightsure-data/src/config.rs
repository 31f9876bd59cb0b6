//! Ledger configuration

use serde::{Deserialize, Serialize};

/// How repeated votes from the same voter for the same votee are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteCounting {
    /// Every vote call increments the votee's counter, even a repeat of an
    /// already-recorded (voter, votee) pair.
    #[default]
    Cumulative,
    /// Only the first vote of a (voter, votee) pair increments the counter.
    OncePerVoter,
}

/// How airline operations treat an identity that was never added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownAirlines {
    /// Finalize, vote and funding calls file a blank record under the
    /// identity. It still reads as not added.
    #[default]
    Materialize,
    /// Those calls fail with `UnknownAirline`.
    Reject,
}

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Vote counting rule
    pub vote_counting: VoteCounting,
    /// Handling of never-added airlines
    pub unknown_airlines: UnknownAirlines,
    /// Capacity of the event broadcast channel
    pub event_capacity: usize,
    /// Initial operational gate value
    pub start_operational: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            vote_counting: VoteCounting::Cumulative,
            unknown_airlines: UnknownAirlines::Materialize,
            event_capacity: crate::DEFAULT_EVENT_CAPACITY,
            start_operational: true,
        }
    }
}

impl LedgerConfig {
    /// Config with one-vote-per-voter counting
    pub fn once_per_voter() -> Self {
        Self {
            vote_counting: VoteCounting::OncePerVoter,
            ..Self::default()
        }
    }

    /// Config that rejects operations on never-added airlines
    pub fn reject_unknown_airlines() -> Self {
        Self {
            unknown_airlines: UnknownAirlines::Reject,
            ..Self::default()
        }
    }
}
