//! Category repository for database operations.

use sqlx::PgPool;

use bazaar_core::{CategoryId, ShortId};

use super::{RepositoryError, allocator, unique_constraint};
use crate::models::{Category, NewCategory};

/// Database row for a category.
#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    parent_id: Option<CategoryId>,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            parent_id: row.parent_id,
            name: row.name,
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new category under an allocator-issued identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a sibling with the same name
    /// exists, `RepositoryError::IdSpaceExhausted` if identifier allocation
    /// gives up, or `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewCategory) -> Result<Category, RepositoryError> {
        let NewCategory {
            id,
            parent_id,
            name,
        } = new;

        allocator::insert_with_unique_id(id.map(CategoryId::into_inner), |candidate| {
            self.insert_row(candidate, parent_id.as_ref(), &name)
        })
        .await
    }

    async fn insert_row(
        &self,
        id: ShortId,
        parent_id: Option<&CategoryId>,
        name: &str,
    ) -> Result<Category, RepositoryError> {
        let row: CategoryRow = sqlx::query_as(
            r"
            INSERT INTO category (id, parent_id, name)
            VALUES ($1, $2, $3)
            RETURNING id, parent_id, name
            ",
        )
        .bind(id.as_str())
        .bind(parent_id.map(CategoryId::as_str))
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match unique_constraint(&e).as_deref() {
            Some("category_pkey") => RepositoryError::IdCollision,
            Some(_) => {
                RepositoryError::Conflict("category name already used at this level".to_owned())
            }
            None => RepositoryError::Database(e),
        })?;

        Ok(row.into())
    }

    /// Get a category by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: &CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row: Option<CategoryRow> =
            sqlx::query_as("SELECT id, parent_id, name FROM category WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// List top-level categories, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_top_level(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            "SELECT id, parent_id, name FROM category WHERE parent_id IS NULL ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List subcategories of a category, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_children(
        &self,
        parent_id: &CategoryId,
    ) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            "SELECT id, parent_id, name FROM category WHERE parent_id = $1 ORDER BY name ASC",
        )
        .bind(parent_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete a category. Subcategories cascade; products keep their rows
    /// with the category cleared.
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: &CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
