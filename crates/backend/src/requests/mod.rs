//! Boundary input schemas and response shapes.
//!
//! Raw request payloads (parsed JSON) deserialize into explicit request
//! structs here, and `validate()` turns each into a domain value or a
//! field-scoped [`ValidationErrors`](bazaar_core::ValidationErrors)
//! collection. Validation accumulates: a payload with a bad email *and* a
//! bad phone reports both.
//!
//! Response structs own the outbound JSON shapes; the one externally pinned
//! contract is the product price list, `[{"price": <number>, "units":
//! <integer>}, ...]` ascending by units, produced by the tier codec's
//! encode path.

pub mod account;
pub mod category;
pub mod order;
pub mod product;
pub mod store;

pub use account::{AccountResponse, CreateAccountRequest, UpdateAccountRequest};
pub use category::{CategoryResponse, CreateCategoryRequest};
pub use order::{CreateOrderRequest, OrderDraft, OrderResponse, UpdateOrderStatusRequest};
pub use product::{
    AttachImageRequest, CreateProductRequest, ImageResponse, ProductResponse, ProductUpdate,
    UpdateProductRequest,
};
pub use store::{CreateStoreRequest, StoreResponse, StoreUpdate, UpdateStoreRequest};

/// Maximum length accepted for human-entered names and titles.
pub(crate) const MAX_NAME_LENGTH: usize = 120;

/// Maximum length accepted for free-text descriptions.
pub(crate) const MAX_DESCRIPTION_LENGTH: usize = 5000;

/// Normalize an optional free-text field: trim, and treat empty as absent.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
