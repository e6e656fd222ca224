//! Order services.

use sqlx::PgPool;

use bazaar_core::{OrderId, StoreId, ValidationErrors};

use crate::db::{OrderRepository, ProductRepository, StoreRepository};
use crate::error::AppError;
use crate::models::NewOrder;
use crate::requests::{CreateOrderRequest, OrderResponse, UpdateOrderStatusRequest};
use crate::services::RequestContext;

/// Place an order for one of a product's price tiers.
///
/// The requested units must name an exact tier; the tier's unit price is
/// captured onto the order so later pricing edits leave history intact.
///
/// # Errors
///
/// Returns `AppError::Validation` for bad input or units without a matching
/// tier, `AppError::NotFound` for an unknown product, or a persistence
/// error.
pub async fn place_order(
    ctx: &RequestContext,
    pool: &PgPool,
    request: CreateOrderRequest,
) -> Result<OrderResponse, AppError> {
    let draft = request.validate(ctx.account_id.clone())?;

    let product = ProductRepository::new(pool)
        .get(&draft.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", draft.product_id)))?;

    let Some(unit_price) = product.price_tiers.price_for(draft.units) else {
        let mut errors = ValidationErrors::new();
        errors.add("units", format!("no price tier for {} units", draft.units));
        return Err(errors.into());
    };

    let order = OrderRepository::new(pool)
        .create(NewOrder {
            id: None,
            customer_id: draft.customer_id,
            store_id: product.store_id,
            product_id: product.id,
            units: draft.units,
            unit_price,
        })
        .await?;

    tracing::info!(
        order_id = %order.id,
        product_id = %order.product_id,
        units = order.units,
        "order placed"
    );
    Ok(order.into())
}

/// Fetch an order. Visible to its customer, the store's owner, and admins.
///
/// # Errors
///
/// Returns `AppError::NotFound` or `AppError::Forbidden`.
pub async fn get(
    ctx: &RequestContext,
    pool: &PgPool,
    id: &OrderId,
) -> Result<OrderResponse, AppError> {
    let order = OrderRepository::new(pool)
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if !ctx.role.is_admin() && !ctx.is_account(&order.customer_id) {
        let store = StoreRepository::new(pool)
            .get(&order.store_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("store {}", order.store_id)))?;
        ctx.require_manage(&store)?;
    }

    Ok(order.into())
}

/// List the caller's orders, newest first.
///
/// # Errors
///
/// Returns a persistence error if the query fails.
pub async fn list_mine(
    ctx: &RequestContext,
    pool: &PgPool,
) -> Result<Vec<OrderResponse>, AppError> {
    let orders = OrderRepository::new(pool)
        .list_by_customer(&ctx.account_id)
        .await?;
    Ok(orders.into_iter().map(Into::into).collect())
}

/// List a store's incoming orders. Store owner or admin.
///
/// # Errors
///
/// Returns `AppError::NotFound` or `AppError::Forbidden`.
pub async fn list_for_store(
    ctx: &RequestContext,
    pool: &PgPool,
    store_id: &StoreId,
) -> Result<Vec<OrderResponse>, AppError> {
    let store = StoreRepository::new(pool)
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {store_id}")))?;
    ctx.require_manage(&store)?;

    let orders = OrderRepository::new(pool).list_by_store(store_id).await?;
    Ok(orders.into_iter().map(Into::into).collect())
}

/// Move an order through its lifecycle. Store owner or admin; transitions
/// are strictly forward, with cancellation from any non-terminal state.
///
/// # Errors
///
/// Returns `AppError::NotFound`, `AppError::Forbidden`,
/// `AppError::Validation` for an unknown status, or `AppError::Conflict`
/// for an illegal transition.
pub async fn update_status(
    ctx: &RequestContext,
    pool: &PgPool,
    id: &OrderId,
    request: UpdateOrderStatusRequest,
) -> Result<OrderResponse, AppError> {
    let repo = OrderRepository::new(pool);
    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let store = StoreRepository::new(pool)
        .get(&order.store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {}", order.store_id)))?;
    ctx.require_manage(&store)?;

    let next = request.validate()?;
    if !order.status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "cannot move order from {} to {next}",
            order.status
        )));
    }

    let order = repo.update_status(id, next).await?;
    tracing::info!(order_id = %id, status = %next, "order status updated");
    Ok(order.into())
}
