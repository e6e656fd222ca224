//! Order request and response schemas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bazaar_core::{AccountId, OrderId, OrderStatus, ProductId, StoreId, ValidationErrors};

use crate::models::Order;

/// Payload for placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub product_id: String,
    pub units: u32,
}

/// A validated order request, before pricing.
///
/// The store and unit price come from the product row; the service resolves
/// them and builds the [`NewOrder`](crate::models::NewOrder).
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: AccountId,
    pub product_id: ProductId,
    pub units: u32,
}

impl CreateOrderRequest {
    /// Validate into an [`OrderDraft`] for `customer_id`.
    ///
    /// # Errors
    ///
    /// Returns the field-scoped collection when any field fails.
    pub fn validate(self, customer_id: AccountId) -> Result<OrderDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let product_id = ProductId::parse(self.product_id.trim())
            .map_err(|e| errors.add("product_id", e.to_string()))
            .ok();

        if self.units == 0 {
            errors.add("units", "units must be at least 1");
        }

        let Some(product_id) = product_id else {
            return Err(errors);
        };

        errors.into_result(OrderDraft {
            customer_id,
            product_id,
            units: self.units,
        })
    }
}

/// Payload for moving an order through its lifecycle.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    /// Target status: `confirmed`, `shipped`, `delivered`, or `cancelled`.
    pub status: String,
}

impl UpdateOrderStatusRequest {
    /// Validate into an [`OrderStatus`].
    ///
    /// # Errors
    ///
    /// Returns the field-scoped collection when the status is unknown.
    pub fn validate(self) -> Result<OrderStatus, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let status = self
            .status
            .trim()
            .parse::<OrderStatus>()
            .map_err(|e| errors.add("status", e))
            .ok();

        let Some(status) = status else {
            return Err(errors);
        };
        Ok(status)
    }
}

/// Outbound order shape. Prices serialize as JSON numbers.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub customer_id: AccountId,
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub units: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let total = order.total();
        Self {
            id: order.id,
            customer_id: order.customer_id,
            store_id: order.store_id,
            product_id: order.product_id,
            units: order.units,
            unit_price: order.unit_price,
            total,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer() -> AccountId {
        AccountId::parse("abcdefghjkmn").unwrap()
    }

    #[test]
    fn test_valid_order() {
        let req = CreateOrderRequest {
            product_id: "pqrstuvwxyz2".to_owned(),
            units: 5,
        };
        let draft = req.validate(customer()).unwrap();
        assert_eq!(draft.units, 5);
        assert_eq!(draft.product_id.as_str(), "pqrstuvwxyz2");
    }

    #[test]
    fn test_zero_units_rejected() {
        let req = CreateOrderRequest {
            product_id: "pqrstuvwxyz2".to_owned(),
            units: 0,
        };
        let errors = req.validate(customer()).unwrap_err();
        assert_eq!(errors.field("units"), ["units must be at least 1"]);
    }

    #[test]
    fn test_malformed_product_id_rejected() {
        let req = CreateOrderRequest {
            product_id: "??".to_owned(),
            units: 1,
        };
        let errors = req.validate(customer()).unwrap_err();
        assert!(!errors.field("product_id").is_empty());
    }

    #[test]
    fn test_status_parse() {
        let req = UpdateOrderStatusRequest {
            status: "shipped".to_owned(),
        };
        assert_eq!(req.validate().unwrap(), OrderStatus::Shipped);

        let req = UpdateOrderStatusRequest {
            status: "teleported".to_owned(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_total_serializes_as_number() {
        let order = Order {
            id: OrderId::parse("abcdefghjkmn").unwrap(),
            customer_id: customer(),
            store_id: StoreId::parse("bcdefghjkmnp").unwrap(),
            product_id: ProductId::parse("cdefghjkmnpq").unwrap(),
            units: 4,
            unit_price: Decimal::new(1250, 2),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(OrderResponse::from(order)).unwrap();
        assert_eq!(json["unit_price"], serde_json::json!(12.5));
        assert_eq!(json["total"], serde_json::json!(50.0));
    }
}
