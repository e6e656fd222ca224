//! Order repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use bazaar_core::{AccountId, OrderId, OrderStatus, ProductId, ShortId, StoreId};

use super::{RepositoryError, allocator, unique_constraint};
use crate::models::{NewOrder, Order};

/// Database row for an order. Units are stored as `INTEGER`; the domain type
/// uses `u32`, so conversion is fallible.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: AccountId,
    store_id: StoreId,
    product_id: ProductId,
    units: i32,
    unit_price: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_domain(self) -> Result<Order, RepositoryError> {
        let units = u32::try_from(self.units).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative units {} on order {}",
                self.units, self.id
            ))
        })?;

        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            store_id: self.store_id,
            product_id: self.product_id,
            units,
            unit_price: self.unit_price,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, customer_id, store_id, product_id, units, unit_price, status, created_at, updated_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new order under an allocator-issued identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::IdSpaceExhausted` if identifier allocation
    /// gives up, or `RepositoryError::Database` for other database errors
    /// (including foreign-key failures for a missing customer or product).
    pub async fn create(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let NewOrder {
            id,
            customer_id,
            store_id,
            product_id,
            units,
            unit_price,
        } = new;

        let units = i32::try_from(units).map_err(|_| {
            RepositoryError::DataCorruption(format!("units {units} exceeds storage range"))
        })?;

        allocator::insert_with_unique_id(id.map(OrderId::into_inner), |candidate| {
            self.insert_row(
                candidate,
                &customer_id,
                &store_id,
                &product_id,
                units,
                unit_price,
            )
        })
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_row(
        &self,
        id: ShortId,
        customer_id: &AccountId,
        store_id: &StoreId,
        product_id: &ProductId,
        units: i32,
        unit_price: Decimal,
    ) -> Result<Order, RepositoryError> {
        let row: OrderRow = sqlx::query_as(
            r"
            INSERT INTO marketplace_order (id, customer_id, store_id, product_id, units, unit_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, customer_id, store_id, product_id, units, unit_price, status,
                      created_at, updated_at
            ",
        )
        .bind(id.as_str())
        .bind(customer_id.as_str())
        .bind(store_id.as_str())
        .bind(product_id.as_str())
        .bind(units)
        .bind(unit_price)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match unique_constraint(&e).as_deref() {
            Some("marketplace_order_pkey") => RepositoryError::IdCollision,
            Some(other) => RepositoryError::Conflict(format!("unique constraint {other} violated")),
            None => RepositoryError::Database(e),
        })?;

        row.into_domain()
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM marketplace_order WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_domain).transpose()
    }

    /// List a customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_by_customer(
        &self,
        customer_id: &AccountId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM marketplace_order WHERE customer_id = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(customer_id.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_domain).collect()
    }

    /// List a store's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_by_store(&self, store_id: &StoreId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM marketplace_order WHERE store_id = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(store_id.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_domain).collect()
    }

    /// Set an order's status. Transition legality is checked by the service
    /// layer before calling this.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r"
            UPDATE marketplace_order
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, customer_id, store_id, product_id, units, unit_price, status,
                      created_at, updated_at
            ",
        )
        .bind(id.as_str())
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.into_domain()
    }
}
