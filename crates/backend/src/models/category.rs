//! Category domain types.

use bazaar_core::CategoryId;

/// A product category (domain type).
///
/// One level of nesting: a category either has no parent (top-level) or a
/// top-level parent (subcategory). Names are unique among siblings.
#[derive(Debug, Clone)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Parent category for subcategories, `None` for top-level.
    pub parent_id: Option<CategoryId>,
    /// Category name.
    pub name: String,
}

/// A new category about to be persisted.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Pre-set identifier; allocated on insert when absent.
    pub id: Option<CategoryId>,
    pub parent_id: Option<CategoryId>,
    pub name: String,
}
