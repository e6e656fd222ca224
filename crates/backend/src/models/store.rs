//! Store domain types.

use chrono::{DateTime, Utc};

use bazaar_core::{AccountId, StoreId, ZipCode};

/// A seller-owned store (domain type). Stores are the platform's tenants.
#[derive(Debug, Clone)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Owning seller account.
    pub owner_id: AccountId,
    /// URL-safe handle, unique across the platform.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Optional storefront description.
    pub description: Option<String>,
    /// Ship-from postal code.
    pub zip_code: ZipCode,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A new store about to be persisted.
#[derive(Debug, Clone)]
pub struct NewStore {
    /// Pre-set identifier; allocated on insert when absent.
    pub id: Option<StoreId>,
    pub owner_id: AccountId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub zip_code: ZipCode,
}
