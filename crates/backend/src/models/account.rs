//! Account domain types.

use chrono::{DateTime, Utc};

use bazaar_core::{AccountId, AccountRole, Email, Phone};

/// A platform account (domain type).
///
/// Customers, sellers, and admins share one table; the role decides what an
/// account may do. Authentication itself is an external collaborator - this
/// record is the identity it resolves to.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Account email address (unique across the platform).
    pub email: Email,
    /// Display name shown on storefronts and orders.
    pub display_name: String,
    /// Contact phone number, if provided.
    pub phone: Option<Phone>,
    /// Permission role.
    pub role: AccountRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A new account about to be persisted.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Pre-set identifier; allocated on insert when absent.
    pub id: Option<AccountId>,
    pub email: Email,
    pub display_name: String,
    pub phone: Option<Phone>,
    pub role: AccountRole,
}
