//! Request-scoped caller identity.

use bazaar_core::{AccountId, AccountRole};

use crate::error::AppError;
use crate::models::Store;

/// The authenticated caller of a service operation.
///
/// Built by the external authentication layer once per request and passed
/// into every service call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Acting account.
    pub account_id: AccountId,
    /// Acting account's role.
    pub role: AccountRole,
}

impl RequestContext {
    /// Create a context for an authenticated account.
    #[must_use]
    pub const fn new(account_id: AccountId, role: AccountRole) -> Self {
        Self { account_id, role }
    }

    /// Whether the caller is the given account.
    #[must_use]
    pub fn is_account(&self, id: &AccountId) -> bool {
        &self.account_id == id
    }

    /// Whether the caller may manage the given store (owner or admin).
    #[must_use]
    pub fn can_manage(&self, store: &Store) -> bool {
        self.role.is_admin() || store.owner_id == self.account_id
    }

    /// Require the platform admin role.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("requires the admin role".to_owned()))
        }
    }

    /// Require a role that may own stores.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for customers.
    pub fn require_seller(&self) -> Result<(), AppError> {
        if self.role.can_sell() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "requires a seller account".to_owned(),
            ))
        }
    }

    /// Require management rights over a store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` when the caller neither owns the store
    /// nor holds the admin role.
    pub fn require_manage(&self, store: &Store) -> Result<(), AppError> {
        if self.can_manage(store) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "not the owner of this store".to_owned(),
            ))
        }
    }

    /// Require the caller to be the given account or an admin.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` otherwise.
    pub fn require_self_or_admin(&self, id: &AccountId) -> Result<(), AppError> {
        if self.role.is_admin() || self.is_account(id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "not allowed to act on another account".to_owned(),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    use bazaar_core::ZipCode;

    fn store_owned_by(owner: &str) -> Store {
        Store {
            id: bazaar_core::StoreId::parse("abcdefghjkmn").unwrap(),
            owner_id: AccountId::parse(owner).unwrap(),
            slug: "test-store".to_owned(),
            name: "Test Store".to_owned(),
            description: None,
            zip_code: ZipCode::parse("97201").unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ctx(id: &str, role: AccountRole) -> RequestContext {
        RequestContext::new(AccountId::parse(id).unwrap(), role)
    }

    #[test]
    fn test_owner_can_manage() {
        let store = store_owned_by("bcdefghjkmnp");
        let owner = ctx("bcdefghjkmnp", AccountRole::Seller);
        assert!(owner.can_manage(&store));
        assert!(owner.require_manage(&store).is_ok());
    }

    #[test]
    fn test_other_seller_cannot_manage() {
        let store = store_owned_by("bcdefghjkmnp");
        let other = ctx("cdefghjkmnpq", AccountRole::Seller);
        assert!(!other.can_manage(&store));
        assert!(matches!(
            other.require_manage(&store),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_bypasses_ownership() {
        let store = store_owned_by("bcdefghjkmnp");
        let admin = ctx("cdefghjkmnpq", AccountRole::Admin);
        assert!(admin.can_manage(&store));
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_self_or_admin(&store.owner_id).is_ok());
    }

    #[test]
    fn test_customer_cannot_sell() {
        let customer = ctx("cdefghjkmnpq", AccountRole::Customer);
        assert!(matches!(
            customer.require_seller(),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            customer.require_admin(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_self_check() {
        let me = ctx("cdefghjkmnpq", AccountRole::Customer);
        assert!(me
            .require_self_or_admin(&AccountId::parse("cdefghjkmnpq").unwrap())
            .is_ok());
        assert!(me
            .require_self_or_admin(&AccountId::parse("bcdefghjkmnp").unwrap())
            .is_err());
    }
}
