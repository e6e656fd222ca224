//! Store services.

use sqlx::PgPool;

use bazaar_core::StoreId;

use crate::db::StoreRepository;
use crate::error::AppError;
use crate::requests::{CreateStoreRequest, StoreResponse, UpdateStoreRequest};
use crate::services::RequestContext;

/// Open a new store owned by the caller. Sellers and admins only.
///
/// # Errors
///
/// Returns `AppError::Forbidden` for customers, `AppError::Validation` for
/// bad input, `AppError::Conflict` if the slug is taken, or a persistence
/// error.
pub async fn open_store(
    ctx: &RequestContext,
    pool: &PgPool,
    request: CreateStoreRequest,
) -> Result<StoreResponse, AppError> {
    ctx.require_seller()?;
    let new = request.validate(ctx.account_id.clone())?;

    let store = StoreRepository::new(pool).create(new).await?;
    tracing::info!(store_id = %store.id, slug = %store.slug, "store opened");
    Ok(store.into())
}

/// Fetch a store by ID. Public.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the store doesn't exist.
pub async fn get(pool: &PgPool, id: &StoreId) -> Result<StoreResponse, AppError> {
    let store = StoreRepository::new(pool)
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;
    Ok(store.into())
}

/// Fetch a store by slug. Public.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the slug is unknown.
pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<StoreResponse, AppError> {
    let store = StoreRepository::new(pool)
        .get_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {slug}")))?;
    Ok(store.into())
}

/// List stores owned by the caller.
///
/// # Errors
///
/// Returns a persistence error if the query fails.
pub async fn list_mine(
    ctx: &RequestContext,
    pool: &PgPool,
) -> Result<Vec<StoreResponse>, AppError> {
    let stores = StoreRepository::new(pool)
        .list_by_owner(&ctx.account_id)
        .await?;
    Ok(stores.into_iter().map(Into::into).collect())
}

/// Update a store's display fields. Owner or admin.
///
/// # Errors
///
/// Returns `AppError::NotFound`, `AppError::Forbidden`, or
/// `AppError::Validation`.
pub async fn update(
    ctx: &RequestContext,
    pool: &PgPool,
    id: &StoreId,
    request: UpdateStoreRequest,
) -> Result<StoreResponse, AppError> {
    let repo = StoreRepository::new(pool);
    let store = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;
    ctx.require_manage(&store)?;

    let update = request.validate()?;
    let store = repo
        .update(id, &update.name, update.description.as_deref(), &update.zip_code)
        .await?;
    Ok(store.into())
}

/// Close (delete) a store. Owner or admin. Products cascade.
///
/// # Errors
///
/// Returns `AppError::NotFound` or `AppError::Forbidden`.
pub async fn close(ctx: &RequestContext, pool: &PgPool, id: &StoreId) -> Result<(), AppError> {
    let repo = StoreRepository::new(pool);
    let store = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;
    ctx.require_manage(&store)?;

    repo.delete(id).await?;
    tracing::info!(store_id = %id, "store closed");
    Ok(())
}
