//! Store repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{AccountId, ShortId, StoreId, ZipCode};

use super::{RepositoryError, allocator, unique_constraint};
use crate::models::{NewStore, Store};

/// Database row for a store.
#[derive(sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    owner_id: AccountId,
    slug: String,
    name: String,
    description: Option<String>,
    zip_code: ZipCode,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            zip_code: row.zip_code,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, owner_id, slug, name, description, zip_code, created_at, updated_at";

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new store under an allocator-issued identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken,
    /// `RepositoryError::IdSpaceExhausted` if identifier allocation gives
    /// up, or `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewStore) -> Result<Store, RepositoryError> {
        let NewStore {
            id,
            owner_id,
            slug,
            name,
            description,
            zip_code,
        } = new;

        allocator::insert_with_unique_id(id.map(StoreId::into_inner), |candidate| {
            self.insert_row(
                candidate,
                &owner_id,
                &slug,
                &name,
                description.as_deref(),
                &zip_code,
            )
        })
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_row(
        &self,
        id: ShortId,
        owner_id: &AccountId,
        slug: &str,
        name: &str,
        description: Option<&str>,
        zip_code: &ZipCode,
    ) -> Result<Store, RepositoryError> {
        let row: StoreRow = sqlx::query_as(
            r"
            INSERT INTO store (id, owner_id, slug, name, description, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, slug, name, description, zip_code, created_at, updated_at
            ",
        )
        .bind(id.as_str())
        .bind(owner_id.as_str())
        .bind(slug)
        .bind(name)
        .bind(description)
        .bind(zip_code.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| match unique_constraint(&e).as_deref() {
            Some("store_pkey") => RepositoryError::IdCollision,
            Some(_) => RepositoryError::Conflict("slug already taken".to_owned()),
            None => RepositoryError::Database(e),
        })?;

        Ok(row.into())
    }

    /// Get a store by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: &StoreId) -> Result<Option<Store>, RepositoryError> {
        let row: Option<StoreRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM store WHERE id = $1"))
                .bind(id.as_str())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// Get a store by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Store>, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM store WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List stores owned by an account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(&self, owner_id: &AccountId) -> Result<Vec<Store>, RepositoryError> {
        let rows: Vec<StoreRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM store WHERE owner_id = $1 ORDER BY created_at ASC"
        ))
        .bind(owner_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a store's display fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: &StoreId,
        name: &str,
        description: Option<&str>,
        zip_code: &ZipCode,
    ) -> Result<Store, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(
            r"
            UPDATE store
            SET name = $2, description = $3, zip_code = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, owner_id, slug, name, description, zip_code, created_at, updated_at
            ",
        )
        .bind(id.as_str())
        .bind(name)
        .bind(description)
        .bind(zip_code.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a store. Products and their images cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if the store was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: &StoreId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
