//! Airline - participant admitted to the scheme by consortium vote

use serde::{Deserialize, Serialize};

use crate::types::account::AccountId;

/// Airline record
///
/// Created pending by the add-airline operation, or blank (zero identity)
/// when a registry operation touches an identity that was never added.
/// `is_registered` only ever flips false -> true, and `registration_votes`
/// never decreases, including across a re-add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    /// Airline identity
    pub id: AccountId,

    /// Display name
    pub name: String,

    /// Registration has been finalized
    pub is_registered: bool,

    /// Seed funding has been submitted
    pub funding_submitted: bool,

    /// Votes received from other airlines
    pub registration_votes: u64,
}

impl Airline {
    /// Create a pending airline
    pub fn pending(id: AccountId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_registered: false,
            funding_submitted: false,
            registration_votes: 0,
        }
    }

    /// Placeholder for an identity that was never added.
    ///
    /// Its stored id is [`AccountId::ZERO`], so it never matches the
    /// identity it is filed under.
    pub fn blank() -> Self {
        Self::pending(AccountId::ZERO, "")
    }

    /// Whether this record was added under `id`
    pub fn is_added_as(&self, id: &AccountId) -> bool {
        !self.id.is_zero() && self.id == *id
    }

    /// Count one more vote, returning the new total
    pub fn add_vote(&mut self) -> Option<u64> {
        self.registration_votes = self.registration_votes.checked_add(1)?;
        Some(self.registration_votes)
    }
}

impl std::fmt::Display for Airline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Airline({}, {}, registered={}, votes={})",
            self.name, self.id, self.is_registered, self.registration_votes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_airline() {
        let airline = Airline::pending(AccountId::from_label("delta"), "Delta");
        assert!(!airline.is_registered);
        assert!(!airline.funding_submitted);
        assert_eq!(airline.registration_votes, 0);
    }

    #[test]
    fn test_blank_matches_no_identity() {
        let blank = Airline::blank();
        assert!(!blank.is_added_as(&AccountId::from_label("delta")));
        assert!(!blank.is_added_as(&AccountId::ZERO));

        let delta = AccountId::from_label("delta");
        assert!(Airline::pending(delta, "Delta").is_added_as(&delta));
    }

    #[test]
    fn test_add_vote() {
        let mut airline = Airline::pending(AccountId::from_label("delta"), "Delta");
        assert_eq!(airline.add_vote(), Some(1));
        assert_eq!(airline.add_vote(), Some(2));

        airline.registration_votes = u64::MAX;
        assert_eq!(airline.add_vote(), None);
        assert_eq!(airline.registration_votes, u64::MAX);
    }
}
