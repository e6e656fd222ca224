//! Product and product-image repositories.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use bazaar_core::{CategoryId, ImageId, PriceTierSet, ProductId, ShortId, StoreId};

use super::{RepositoryError, allocator, unique_constraint};
use crate::models::{NewProduct, NewProductImage, Product, ProductImage};

/// Database row for a product. Price tiers are stored as a JSONB object
/// keyed by stringified units; the codec restores numeric ordering on load.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    store_id: StoreId,
    category_id: Option<CategoryId>,
    name: String,
    description: Option<String>,
    price_tiers: Json<PriceTierSet>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
            price_tiers: row.price_tiers.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a product image.
#[derive(sqlx::FromRow)]
struct ProductImageRow {
    id: ImageId,
    product_id: ProductId,
    blob_key: String,
    position: i32,
}

impl From<ProductImageRow> for ProductImage {
    fn from(row: ProductImageRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            blob_key: row.blob_key,
            position: row.position,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, store_id, category_id, name, description, price_tiers, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product under an allocator-issued identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::IdSpaceExhausted` if identifier allocation
    /// gives up, or `RepositoryError::Database` for other database errors
    /// (including foreign-key failures for a missing store or category).
    pub async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let NewProduct {
            id,
            store_id,
            category_id,
            name,
            description,
            price_tiers,
        } = new;

        allocator::insert_with_unique_id(id.map(ProductId::into_inner), |candidate| {
            self.insert_row(
                candidate,
                &store_id,
                category_id.as_ref(),
                &name,
                description.as_deref(),
                &price_tiers,
            )
        })
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_row(
        &self,
        id: ShortId,
        store_id: &StoreId,
        category_id: Option<&CategoryId>,
        name: &str,
        description: Option<&str>,
        price_tiers: &PriceTierSet,
    ) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            r"
            INSERT INTO product (id, store_id, category_id, name, description, price_tiers)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, store_id, category_id, name, description, price_tiers,
                      created_at, updated_at
            ",
        )
        .bind(id.as_str())
        .bind(store_id.as_str())
        .bind(category_id.map(CategoryId::as_str))
        .bind(name)
        .bind(description)
        .bind(Json(price_tiers))
        .fetch_one(self.pool)
        .await
        .map_err(|e| match unique_constraint(&e).as_deref() {
            Some("product_pkey") => RepositoryError::IdCollision,
            Some(other) => RepositoryError::Conflict(format!("unique constraint {other} violated")),
            None => RepositoryError::Database(e),
        })?;

        Ok(row.into())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List a store's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_store(&self, store_id: &StoreId) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List products in a category, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE category_id = $1 ORDER BY created_at DESC"
        ))
        .bind(category_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Replace a product's editable fields, price tiers included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: &ProductId,
        category_id: Option<&CategoryId>,
        name: &str,
        description: Option<&str>,
        price_tiers: &PriceTierSet,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            UPDATE product
            SET category_id = $2, name = $3, description = $4, price_tiers = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING id, store_id, category_id, name, description, price_tiers,
                      created_at, updated_at
            ",
        )
        .bind(id.as_str())
        .bind(category_id.map(CategoryId::as_str))
        .bind(name)
        .bind(description)
        .bind(Json(price_tiers))
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Images cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Attach an image reference to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::IdSpaceExhausted` if identifier allocation
    /// gives up, or `RepositoryError::Database` for other database errors.
    pub async fn add_image(&self, new: NewProductImage) -> Result<ProductImage, RepositoryError> {
        let NewProductImage {
            id,
            product_id,
            blob_key,
            position,
        } = new;

        allocator::insert_with_unique_id(id.map(ImageId::into_inner), |candidate| {
            self.insert_image_row(candidate, &product_id, &blob_key, position)
        })
        .await
    }

    async fn insert_image_row(
        &self,
        id: ShortId,
        product_id: &ProductId,
        blob_key: &str,
        position: i32,
    ) -> Result<ProductImage, RepositoryError> {
        let row: ProductImageRow = sqlx::query_as(
            r"
            INSERT INTO product_image (id, product_id, blob_key, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_id, blob_key, position
            ",
        )
        .bind(id.as_str())
        .bind(product_id.as_str())
        .bind(blob_key)
        .bind(position)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match unique_constraint(&e).as_deref() {
            Some("product_image_pkey") => RepositoryError::IdCollision,
            Some(other) => RepositoryError::Conflict(format!("unique constraint {other} violated")),
            None => RepositoryError::Database(e),
        })?;

        Ok(row.into())
    }

    /// List a product's images in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_images(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<ProductImage>, RepositoryError> {
        let rows: Vec<ProductImageRow> = sqlx::query_as(
            r"
            SELECT id, product_id, blob_key, position
            FROM product_image
            WHERE product_id = $1
            ORDER BY position ASC
            ",
        )
        .bind(product_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Detach an image from a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the image was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_image(
        &self,
        product_id: &ProductId,
        image_id: &ImageId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product_image WHERE id = $1 AND product_id = $2")
            .bind(image_id.as_str())
            .bind(product_id.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
