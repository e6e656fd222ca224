//! Catalog services: categories, products, and product images.

use sqlx::PgPool;

use bazaar_core::{CategoryId, ImageId, ProductId, StoreId, ValidationErrors};

use crate::db::{CategoryRepository, ProductRepository, StoreRepository};
use crate::error::AppError;
use crate::models::{NewProductImage, Store};
use crate::requests::{
    AttachImageRequest, CategoryResponse, CreateCategoryRequest, CreateProductRequest,
    ImageResponse, ProductResponse, UpdateProductRequest,
};
use crate::services::RequestContext;

/// Fetch a store and check the caller may manage it.
async fn managed_store(
    ctx: &RequestContext,
    pool: &PgPool,
    store_id: &StoreId,
) -> Result<Store, AppError> {
    let store = StoreRepository::new(pool)
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {store_id}")))?;
    ctx.require_manage(&store)?;
    Ok(store)
}

/// Check a referenced category exists, reporting a `category_id` field
/// error when it doesn't.
async fn check_category_exists(
    pool: &PgPool,
    category_id: Option<&CategoryId>,
) -> Result<(), AppError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    if CategoryRepository::new(pool).get(category_id).await?.is_none() {
        let mut errors = ValidationErrors::new();
        errors.add("category_id", "category does not exist");
        return Err(errors.into());
    }
    Ok(())
}

// =============================================================================
// Categories
// =============================================================================

/// Create a category or subcategory. Admin only.
///
/// Nesting is one level deep: a subcategory's parent must itself be
/// top-level.
///
/// # Errors
///
/// Returns `AppError::Forbidden`, `AppError::Validation` (bad input, missing
/// or nested parent), `AppError::Conflict` for a sibling name clash, or a
/// persistence error.
pub async fn create_category(
    ctx: &RequestContext,
    pool: &PgPool,
    request: CreateCategoryRequest,
) -> Result<CategoryResponse, AppError> {
    ctx.require_admin()?;
    let new = request.validate()?;

    if let Some(ref parent_id) = new.parent_id {
        let parent = CategoryRepository::new(pool)
            .get(parent_id)
            .await?
            .ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.add("parent_id", "parent category does not exist");
                AppError::Validation(errors)
            })?;
        if parent.parent_id.is_some() {
            let mut errors = ValidationErrors::new();
            errors.add("parent_id", "subcategories cannot be nested further");
            return Err(errors.into());
        }
    }

    let category = CategoryRepository::new(pool).create(new).await?;
    tracing::info!(category_id = %category.id, name = %category.name, "category created");
    Ok(category.into())
}

/// List top-level categories. Public.
///
/// # Errors
///
/// Returns a persistence error if the query fails.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryResponse>, AppError> {
    let categories = CategoryRepository::new(pool).list_top_level().await?;
    Ok(categories.into_iter().map(Into::into).collect())
}

/// List subcategories of a category. Public.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown parent.
pub async fn list_subcategories(
    pool: &PgPool,
    parent_id: &CategoryId,
) -> Result<Vec<CategoryResponse>, AppError> {
    let repo = CategoryRepository::new(pool);
    if repo.get(parent_id).await?.is_none() {
        return Err(AppError::NotFound(format!("category {parent_id}")));
    }
    let categories = repo.list_children(parent_id).await?;
    Ok(categories.into_iter().map(Into::into).collect())
}

/// Delete a category. Admin only. Subcategories cascade; products are left
/// uncategorized.
///
/// # Errors
///
/// Returns `AppError::Forbidden` or `AppError::NotFound`.
pub async fn delete_category(
    ctx: &RequestContext,
    pool: &PgPool,
    id: &CategoryId,
) -> Result<(), AppError> {
    ctx.require_admin()?;
    let deleted = CategoryRepository::new(pool).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("category {id}")));
    }
    tracing::info!(category_id = %id, "category deleted");
    Ok(())
}

// =============================================================================
// Products
// =============================================================================

/// Add a product to a store. Store owner or admin.
///
/// # Errors
///
/// Returns `AppError::NotFound` (store), `AppError::Forbidden`,
/// `AppError::Validation` (bad fields, bad tiers, unknown category), or a
/// persistence error.
pub async fn add_product(
    ctx: &RequestContext,
    pool: &PgPool,
    store_id: &StoreId,
    request: CreateProductRequest,
) -> Result<ProductResponse, AppError> {
    let store = managed_store(ctx, pool, store_id).await?;
    let new = request.validate(store.id)?;
    check_category_exists(pool, new.category_id.as_ref()).await?;

    let product = ProductRepository::new(pool).create(new).await?;
    tracing::info!(product_id = %product.id, store_id = %store_id, "product added");
    Ok(product.into())
}

/// Fetch a product with its images. Public.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product doesn't exist.
pub async fn get_product(pool: &PgPool, id: &ProductId) -> Result<ProductResponse, AppError> {
    let repo = ProductRepository::new(pool);
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let images = repo.list_images(id).await?;

    let mut response = ProductResponse::from(product);
    response.images = images.into_iter().map(ImageResponse::from).collect();
    Ok(response)
}

/// List a store's products. Public. Images are not expanded here; fetch a
/// single product for those.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown store.
pub async fn list_store_products(
    pool: &PgPool,
    store_id: &StoreId,
) -> Result<Vec<ProductResponse>, AppError> {
    if StoreRepository::new(pool).get(store_id).await?.is_none() {
        return Err(AppError::NotFound(format!("store {store_id}")));
    }
    let products = ProductRepository::new(pool).list_by_store(store_id).await?;
    Ok(products.into_iter().map(Into::into).collect())
}

/// Update a product, price tiers included. Store owner or admin.
///
/// # Errors
///
/// Returns `AppError::NotFound`, `AppError::Forbidden`,
/// `AppError::Validation`, or a persistence error.
pub async fn update_product(
    ctx: &RequestContext,
    pool: &PgPool,
    id: &ProductId,
    request: UpdateProductRequest,
) -> Result<ProductResponse, AppError> {
    let repo = ProductRepository::new(pool);
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    managed_store(ctx, pool, &product.store_id).await?;

    let update = request.validate()?;
    check_category_exists(pool, update.category_id.as_ref()).await?;

    let product = repo
        .update(
            id,
            update.category_id.as_ref(),
            &update.name,
            update.description.as_deref(),
            &update.price_tiers,
        )
        .await?;
    Ok(product.into())
}

/// Remove a product. Store owner or admin. Images cascade.
///
/// # Errors
///
/// Returns `AppError::NotFound` or `AppError::Forbidden`.
pub async fn remove_product(
    ctx: &RequestContext,
    pool: &PgPool,
    id: &ProductId,
) -> Result<(), AppError> {
    let repo = ProductRepository::new(pool);
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    managed_store(ctx, pool, &product.store_id).await?;

    repo.delete(id).await?;
    tracing::info!(product_id = %id, "product removed");
    Ok(())
}

/// Attach an uploaded image to a product. Store owner or admin. The bytes
/// themselves live in the external blob store.
///
/// # Errors
///
/// Returns `AppError::NotFound`, `AppError::Forbidden`,
/// `AppError::Validation`, or a persistence error.
pub async fn attach_image(
    ctx: &RequestContext,
    pool: &PgPool,
    product_id: &ProductId,
    request: AttachImageRequest,
) -> Result<ImageResponse, AppError> {
    let repo = ProductRepository::new(pool);
    let product = repo
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
    managed_store(ctx, pool, &product.store_id).await?;

    let (blob_key, position) = request.validate()?;
    let image = repo
        .add_image(NewProductImage {
            id: None,
            product_id: product.id,
            blob_key,
            position,
        })
        .await?;
    Ok(image.into())
}

/// Detach an image from a product. Store owner or admin.
///
/// # Errors
///
/// Returns `AppError::NotFound` or `AppError::Forbidden`.
pub async fn remove_image(
    ctx: &RequestContext,
    pool: &PgPool,
    product_id: &ProductId,
    image_id: &ImageId,
) -> Result<(), AppError> {
    let repo = ProductRepository::new(pool);
    let product = repo
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
    managed_store(ctx, pool, &product.store_id).await?;

    let deleted = repo.delete_image(product_id, image_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("image {image_id}")));
    }
    Ok(())
}
