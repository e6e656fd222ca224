//! Product request and response schemas.
//!
//! This is the boundary the price-tier codec serves: raw `prices` JSON in,
//! decoded through [`PriceTierSet::decode`] with its exact error strings
//! surfaced under the `prices` field; encoded tier lists out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use bazaar_core::{
    CategoryId, ImageId, PriceTier, PriceTierSet, ProductId, StoreId, ValidationErrors,
};

use super::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, normalize_optional};
use crate::models::{NewProduct, Product, ProductImage};

/// Payload for adding a product to a store.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    /// Raw tier list: `[{"price": <number>, "units": <integer>}, ...]`.
    /// Absent or `null` means no pricing set.
    #[serde(default)]
    pub prices: Option<Value>,
}

impl CreateProductRequest {
    /// Validate into a [`NewProduct`] for `store_id`.
    ///
    /// # Errors
    ///
    /// Returns the field-scoped collection when any field fails; tier
    /// problems appear under `prices` with the codec's message verbatim.
    pub fn validate(self, store_id: StoreId) -> Result<NewProduct, ValidationErrors> {
        let fields = validate_product_fields(
            self.name,
            self.description,
            self.category_id,
            self.prices.as_ref(),
        )?;
        Ok(NewProduct {
            id: None,
            store_id,
            category_id: fields.category_id,
            name: fields.name,
            description: fields.description,
            price_tiers: fields.price_tiers,
        })
    }
}

/// Payload for editing a product. A full replace: omitted `prices` clears
/// the tier set.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub prices: Option<Value>,
}

/// Validated product edits.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub price_tiers: PriceTierSet,
}

impl UpdateProductRequest {
    /// Validate into a [`ProductUpdate`]. Same field rules as creation.
    ///
    /// # Errors
    ///
    /// Returns the field-scoped collection when any field fails.
    pub fn validate(self) -> Result<ProductUpdate, ValidationErrors> {
        validate_product_fields(
            self.name,
            self.description,
            self.category_id,
            self.prices.as_ref(),
        )
    }
}

/// Field rules shared by product creation and update.
fn validate_product_fields(
    name: String,
    description: Option<String>,
    category_id: Option<String>,
    prices: Option<&Value>,
) -> Result<ProductUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = name.trim().to_owned();
    if name.is_empty() {
        errors.add("name", "name cannot be empty");
    } else if name.len() > MAX_NAME_LENGTH {
        errors.add(
            "name",
            format!("name must be at most {MAX_NAME_LENGTH} characters"),
        );
    }

    let description = normalize_optional(description);
    if let Some(ref text) = description
        && text.len() > MAX_DESCRIPTION_LENGTH
    {
        errors.add(
            "description",
            format!("description must be at most {MAX_DESCRIPTION_LENGTH} characters"),
        );
    }

    let category_id = match category_id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => CategoryId::parse(raw)
            .map(Some)
            .map_err(|e| errors.add("category_id", e.to_string()))
            .ok()
            .flatten(),
        _ => None,
    };

    let price_tiers = PriceTierSet::decode(prices)
        .map_err(|e| errors.add("prices", e.to_string()))
        .ok();

    let Some(price_tiers) = price_tiers else {
        return Err(errors);
    };

    errors.into_result(ProductUpdate {
        name,
        description,
        category_id,
        price_tiers,
    })
}

/// Payload for attaching an image reference to a product.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachImageRequest {
    /// Key of the already-uploaded blob in the external image store.
    pub blob_key: String,
    #[serde(default)]
    pub position: Option<i32>,
}

impl AttachImageRequest {
    /// Validate into `(blob_key, position)`.
    ///
    /// # Errors
    ///
    /// Returns the field-scoped collection when any field fails.
    pub fn validate(self) -> Result<(String, i32), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let blob_key = self.blob_key.trim().to_owned();
        if blob_key.is_empty() {
            errors.add("blob_key", "blob key cannot be empty");
        }

        let position = self.position.unwrap_or(0);
        if position < 0 {
            errors.add("position", "position cannot be negative");
        }

        errors.into_result((blob_key, position))
    }
}

/// Outbound image shape.
#[derive(Debug, Clone, Serialize)]
pub struct ImageResponse {
    pub id: ImageId,
    pub blob_key: String,
    pub position: i32,
}

impl From<ProductImage> for ImageResponse {
    fn from(image: ProductImage) -> Self {
        Self {
            id: image.id,
            blob_key: image.blob_key,
            position: image.position,
        }
    }
}

/// Outbound product shape. `prices` is the encoded tier list, ascending by
/// units - the pinned external contract.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub prices: Vec<PriceTier>,
    pub images: Vec<ImageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            store_id: product.store_id,
            category_id: product.category_id,
            name: product.name,
            description: product.description,
            prices: product.price_tiers.encode(),
            images: Vec::new(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> StoreId {
        StoreId::parse("abcdefghjkmn").unwrap()
    }

    #[test]
    fn test_valid_product_with_tiers() {
        let req = CreateProductRequest {
            name: "Bulk Coffee".to_owned(),
            description: None,
            category_id: None,
            prices: Some(json!([
                {"price": 14.0, "units": 1},
                {"price": 12.5, "units": 5},
            ])),
        };
        let new = req.validate(store()).unwrap();
        assert_eq!(new.price_tiers.len(), 2);
    }

    #[test]
    fn test_absent_prices_means_no_pricing() {
        let req = CreateProductRequest {
            name: "Unpriced".to_owned(),
            description: None,
            category_id: None,
            prices: None,
        };
        let new = req.validate(store()).unwrap();
        assert!(new.price_tiers.is_empty());
    }

    #[test]
    fn test_codec_message_surfaces_under_prices_field() {
        let req = CreateProductRequest {
            name: "Bad Tiers".to_owned(),
            description: None,
            category_id: None,
            prices: Some(json!("invalid_data")),
        };
        let errors = req.validate(store()).unwrap_err();
        assert_eq!(
            errors.field("prices"),
            ["Prices must be a list of objects with price and units keys"]
        );
    }

    #[test]
    fn test_duplicate_report_surfaces_verbatim() {
        let req = CreateProductRequest {
            name: "Dup Tiers".to_owned(),
            description: None,
            category_id: None,
            prices: Some(json!([
                {"price": 125, "units": 1},
                {"price": 130, "units": 1},
                {"price": 150, "units": 2},
                {"price": 150, "units": 4},
            ])),
        };
        let errors = req.validate(store()).unwrap_err();
        assert_eq!(
            errors.field("prices"),
            ["Duplicate units found: 1 and duplicate prices found: 150"]
        );
    }

    #[test]
    fn test_name_and_prices_errors_reported_together() {
        let req = CreateProductRequest {
            name: String::new(),
            description: None,
            category_id: None,
            prices: Some(json!([{"price": "hello", "units": 1}])),
        };
        let errors = req.validate(store()).unwrap_err();
        assert_eq!(errors.field("name"), ["name cannot be empty"]);
        assert_eq!(errors.field("prices"), ["Price must be a valid float"]);
    }

    #[test]
    fn test_response_encodes_tiers_ascending() {
        let tiers = PriceTierSet::decode(Some(&json!([
            {"price": 9.0, "units": 50},
            {"price": 11.0, "units": 5},
        ])))
        .unwrap();
        let product = Product {
            id: ProductId::parse("abcdefghjkmn").unwrap(),
            store_id: store(),
            category_id: None,
            name: "Tea".to_owned(),
            description: None,
            price_tiers: tiers,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response = ProductResponse::from(product);
        let json = serde_json::to_value(&response.prices).unwrap();
        assert_eq!(
            json,
            json!([
                {"price": 11.0, "units": 5},
                {"price": 9.0, "units": 50},
            ])
        );
    }
}
