//! Authorization registry
//!
//! Tracks the contract owner and the set of callers allowed to invoke
//! gated operations. The owner is authorized at construction and stays
//! authorized until explicitly revoked.

use std::collections::BTreeMap;

use flightsure_common::{AccountId, LedgerError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Owner plus authorized-caller map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationRegistry {
    owner: AccountId,
    authorized: BTreeMap<AccountId, bool>,
}

impl AuthorizationRegistry {
    /// Create a registry with `owner` seeded as authorized
    pub fn new(owner: AccountId) -> Self {
        let mut authorized = BTreeMap::new();
        authorized.insert(owner, true);
        Self { owner, authorized }
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn is_owner(&self, caller: &AccountId) -> bool {
        self.owner == *caller
    }

    /// Absent and explicitly revoked identities are both unauthorized
    pub fn is_authorized(&self, caller: &AccountId) -> bool {
        self.authorized.get(caller).copied().unwrap_or(false)
    }

    pub fn authorize(&mut self, id: AccountId) {
        self.authorized.insert(id, true);
    }

    pub fn deauthorize(&mut self, id: AccountId) {
        self.authorized.insert(id, false);
    }

    /// Currently authorized identities, in id order
    pub fn authorized(&self) -> Vec<AccountId> {
        self.authorized
            .iter()
            .filter(|(_, allowed)| **allowed)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn require_owner(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if !self.is_owner(caller) {
            warn!(caller = %caller, "Rejected owner-only call");
            return Err(LedgerError::NotOwner { caller: *caller });
        }
        Ok(())
    }

    pub fn require_authorized(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if !self.is_authorized(caller) {
            warn!(caller = %caller, "Rejected unauthorized caller");
            return Err(LedgerError::Unauthorized { caller: *caller });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> AccountId {
        AccountId::from_label("owner")
    }

    #[test]
    fn test_owner_seeded() {
        let registry = AuthorizationRegistry::new(owner());
        assert!(registry.is_authorized(&owner()));
        assert!(registry.require_owner(&owner()).is_ok());
        assert_eq!(registry.authorized(), vec![owner()]);
    }

    #[test]
    fn test_authorize_idempotent() {
        let app = AccountId::from_label("app");
        let mut registry = AuthorizationRegistry::new(owner());

        registry.authorize(app);
        registry.authorize(app);
        assert!(registry.is_authorized(&app));
        assert_eq!(registry.authorized().len(), 2);
    }

    #[test]
    fn test_deauthorized_and_absent_rejected() {
        let app = AccountId::from_label("app");
        let stranger = AccountId::from_label("stranger");
        let mut registry = AuthorizationRegistry::new(owner());

        registry.authorize(app);
        registry.deauthorize(app);

        assert_eq!(
            registry.require_authorized(&app),
            Err(LedgerError::Unauthorized { caller: app })
        );
        assert_eq!(
            registry.require_authorized(&stranger),
            Err(LedgerError::Unauthorized { caller: stranger })
        );
    }

    #[test]
    fn test_owner_can_be_deauthorized_but_stays_owner() {
        let mut registry = AuthorizationRegistry::new(owner());
        registry.deauthorize(owner());

        assert!(!registry.is_authorized(&owner()));
        assert!(registry.require_owner(&owner()).is_ok());
    }

    #[test]
    fn test_non_owner_rejected() {
        let registry = AuthorizationRegistry::new(owner());
        let other = AccountId::from_label("other");
        assert_eq!(
            registry.require_owner(&other),
            Err(LedgerError::NotOwner { caller: other })
        );
    }
}
