//! Airline registry and consortium voting
//!
//! Holds pending and registered airline records, the ordered list of
//! finalized airlines, and the vote-pair ledger. The registry records
//! votes and exposes counts; deciding when a count is high enough to
//! finalize belongs to the caller.

use std::collections::{BTreeMap, BTreeSet};

use flightsure_common::{AccountId, Airline, KeyDigest, LedgerError, VoteKey};
use serde::{Deserialize, Serialize};

use crate::config::{UnknownAirlines, VoteCounting};

/// Airline records plus vote ledger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirlineRegistry {
    airlines: BTreeMap<AccountId, Airline>,
    registered: Vec<AccountId>,
    votes: BTreeSet<KeyDigest>,
}

impl AirlineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pending airline.
    ///
    /// Re-adding an identity replaces its name and clears the funding flag.
    /// Registration status and vote count carry over. Returns the previous
    /// record, if any.
    pub fn add(&mut self, id: AccountId, name: &str) -> Option<Airline> {
        match self.airlines.get_mut(&id) {
            Some(existing) => {
                let previous = existing.clone();
                existing.id = id;
                existing.name = name.to_string();
                existing.funding_submitted = false;
                Some(previous)
            }
            None => {
                self.airlines.insert(id, Airline::pending(id, name));
                None
            }
        }
    }

    /// Whether the record under `id` was added as `id`
    pub fn exists(&self, id: &AccountId) -> bool {
        self.airlines.get(id).is_some_and(|a| a.is_added_as(id))
    }

    pub fn get(&self, id: &AccountId) -> Option<&Airline> {
        self.airlines.get(id)
    }

    fn record_mut(
        &mut self,
        id: &AccountId,
        unknown: UnknownAirlines,
    ) -> Result<&mut Airline, LedgerError> {
        if unknown == UnknownAirlines::Reject && !self.exists(id) {
            return Err(LedgerError::UnknownAirline { airline: *id });
        }
        Ok(self.airlines.entry(*id).or_insert_with(Airline::blank))
    }

    /// Mark the airline registered and list it once.
    ///
    /// Returns `true` when this call performed the transition.
    pub fn finalize(
        &mut self,
        id: &AccountId,
        unknown: UnknownAirlines,
    ) -> Result<bool, LedgerError> {
        let airline = self.record_mut(id, unknown)?;
        let newly = !airline.is_registered;
        airline.is_registered = true;

        if !self.registered.contains(id) {
            self.registered.push(*id);
        }
        Ok(newly)
    }

    pub fn is_registered(&self, id: &AccountId) -> bool {
        self.airlines.get(id).is_some_and(|a| a.is_registered)
    }

    /// Registered airlines in finalization order
    pub fn registered(&self) -> &[AccountId] {
        &self.registered
    }

    pub fn has_voted(&self, voter: &AccountId, votee: &AccountId) -> bool {
        self.votes.contains(&VoteKey::new(*voter, *votee).digest())
    }

    /// Record a vote and return the votee's updated count.
    ///
    /// Under [`VoteCounting::Cumulative`] a repeated (voter, votee) pair
    /// still increments; under [`VoteCounting::OncePerVoter`] it does not.
    pub fn vote(
        &mut self,
        voter: &AccountId,
        votee: &AccountId,
        counting: VoteCounting,
        unknown: UnknownAirlines,
    ) -> Result<u64, LedgerError> {
        let digest = VoteKey::new(*voter, *votee).digest();
        let first = !self.votes.contains(&digest);

        let airline = self.record_mut(votee, unknown)?;
        let count = if first || counting == VoteCounting::Cumulative {
            airline.add_vote().ok_or(LedgerError::ArithmeticOverflow)?
        } else {
            airline.registration_votes
        };

        self.votes.insert(digest);
        Ok(count)
    }

    pub fn votes_for(&self, id: &AccountId) -> u64 {
        self.airlines
            .get(id)
            .map(|a| a.registration_votes)
            .unwrap_or(0)
    }

    /// Returns `true` when the flag was newly set
    pub fn set_funding_submitted(
        &mut self,
        id: &AccountId,
        unknown: UnknownAirlines,
    ) -> Result<bool, LedgerError> {
        let airline = self.record_mut(id, unknown)?;
        let newly = !airline.funding_submitted;
        airline.funding_submitted = true;
        Ok(newly)
    }

    pub fn is_funded(&self, id: &AccountId) -> bool {
        self.airlines.get(id).is_some_and(|a| a.funding_submitted)
    }

    /// Number of records, blank ones included
    pub fn count(&self) -> usize {
        self.airlines.len()
    }
}
