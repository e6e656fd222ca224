//! Database operations for the marketplace `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `account` - Customers, sellers, and platform admins
//! - `store` - Seller-owned tenants
//! - `category` - Product categories with one level of subcategories
//! - `product` / `product_image` - Store catalog entries and their blob keys
//! - `marketplace_order` - Purchases with captured tier pricing
//!
//! All primary keys are allocator-issued short identifiers; every creation
//! path runs through [`allocator::insert_with_unique_id`]. Repositories map
//! Postgres unique violations by constraint name: the table's `*_pkey`
//! constraint becomes [`RepositoryError::IdCollision`] (retried by the
//! allocator), anything else becomes [`RepositoryError::Conflict`]
//! (propagated untouched).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/backend/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate
//! ```

pub mod accounts;
pub mod allocator;
pub mod categories;
pub mod orders;
pub mod products;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use stores::StoreRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation other than the primary key (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An insert was rejected because the generated identifier already
    /// exists. Internal to the allocator's retry loop.
    #[error("identifier collision")]
    IdCollision,

    /// The allocator ran out of attempts without finding a free identifier.
    #[error("identifier allocation exhausted after {attempts} attempts")]
    IdSpaceExhausted {
        /// Number of insert attempts made.
        attempts: u32,
    },
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Constraint name of a Postgres unique violation, if `err` is one.
///
/// A unique violation whose constraint name is somehow absent reports as an
/// empty string so callers still classify it as a conflict rather than a
/// generic database error.
pub(crate) fn unique_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or_default().to_owned())
        }
        _ => None,
    }
}
