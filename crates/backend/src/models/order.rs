//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use bazaar_core::{AccountId, OrderId, OrderStatus, ProductId, StoreId};

/// A purchase of one product tier (domain type).
///
/// The unit price is captured from the product's tier map at creation time;
/// later pricing edits do not rewrite history.
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Purchasing customer account.
    pub customer_id: AccountId,
    /// Store the product was bought from.
    pub store_id: StoreId,
    /// Product purchased.
    pub product_id: ProductId,
    /// Quantity purchased; must name an exact price tier at creation.
    pub units: u32,
    /// Unit price at the purchased tier, captured at creation.
    pub unit_price: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Total price: units x unit price.
    #[must_use]
    pub fn total(&self) -> Decimal {
        Decimal::from(self.units) * self.unit_price
    }
}

/// A new order about to be persisted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Pre-set identifier; allocated on insert when absent.
    pub id: Option<OrderId>,
    pub customer_id: AccountId,
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub units: u32,
    pub unit_price: Decimal,
}
