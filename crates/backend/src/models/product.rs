//! Product domain types.

use chrono::{DateTime, Utc};

use bazaar_core::{CategoryId, ImageId, PriceTierSet, ProductId, StoreId};

/// A catalog product (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Store this product belongs to.
    pub store_id: StoreId,
    /// Category placement, if categorized.
    pub category_id: Option<CategoryId>,
    /// Product name.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Bulk pricing: units -> unit price. Empty means no pricing set.
    pub price_tiers: PriceTierSet,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A new product about to be persisted.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Pre-set identifier; allocated on insert when absent.
    pub id: Option<ProductId>,
    pub store_id: StoreId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub price_tiers: PriceTierSet,
}

/// A product image reference (domain type).
///
/// The bytes live in an external blob store; this row only carries the key
/// and display position.
#[derive(Debug, Clone)]
pub struct ProductImage {
    /// Unique image ID.
    pub id: ImageId,
    /// Product this image belongs to.
    pub product_id: ProductId,
    /// Key into the external blob store.
    pub blob_key: String,
    /// Display position, ascending from zero.
    pub position: i32,
}

/// A new product image about to be persisted.
#[derive(Debug, Clone)]
pub struct NewProductImage {
    /// Pre-set identifier; allocated on insert when absent.
    pub id: Option<ImageId>,
    pub product_id: ProductId,
    pub blob_key: String,
    pub position: i32,
}
