//! Seed an empty database with demo data.
//!
//! Everything goes through the real service creation paths, so seeded rows
//! get allocator-issued identifiers and codec-validated price tiers exactly
//! like production writes. Expects a freshly migrated, empty database;
//! re-running against seeded data fails on the unique email/slug rows.

use serde_json::json;
use tracing::info;

use bazaar_backend::config::BackendConfig;
use bazaar_backend::db;
use bazaar_backend::requests::{
    CreateAccountRequest, CreateCategoryRequest, CreateOrderRequest, CreateProductRequest,
    CreateStoreRequest,
};
use bazaar_backend::services::{RequestContext, accounts, catalog, orders, stores};
use bazaar_core::{AccountRole, Email};

/// Seed demo accounts, a store, categories, products, and an order.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is
/// unreachable, or any creation path fails (e.g., data already seeded).
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = BackendConfig::from_env()?;
    let pool = db::create_pool(&config.database_url, config.max_connections).await?;

    // Admin, seller, customer.
    let admin = accounts::provision_admin(
        &pool,
        Email::parse("admin@bazaar.test")?,
        "Platform Admin".to_owned(),
    )
    .await?;
    let admin_ctx = RequestContext::new(admin.id.clone(), AccountRole::Admin);

    let seller = accounts::register(
        &pool,
        CreateAccountRequest {
            email: "seller@bazaar.test".to_owned(),
            display_name: "Demo Seller".to_owned(),
            phone: Some("+1 555 867 5309".to_owned()),
            role: Some("seller".to_owned()),
        },
    )
    .await?;
    let seller_ctx = RequestContext::new(seller.id.clone(), AccountRole::Seller);

    let customer = accounts::register(
        &pool,
        CreateAccountRequest {
            email: "customer@bazaar.test".to_owned(),
            display_name: "Demo Customer".to_owned(),
            phone: None,
            role: None,
        },
    )
    .await?;
    let customer_ctx = RequestContext::new(customer.id.clone(), AccountRole::Customer);

    info!(admin = %admin.id, seller = %seller.id, customer = %customer.id, "accounts seeded");

    // Categories: one top-level with a subcategory.
    let pantry = catalog::create_category(
        &admin_ctx,
        &pool,
        CreateCategoryRequest {
            name: "Pantry".to_owned(),
            parent_id: None,
        },
    )
    .await?;
    let coffee = catalog::create_category(
        &admin_ctx,
        &pool,
        CreateCategoryRequest {
            name: "Coffee & Tea".to_owned(),
            parent_id: Some(pantry.id.as_str().to_owned()),
        },
    )
    .await?;

    // Store with tier-priced products.
    let store = stores::open_store(
        &seller_ctx,
        &pool,
        CreateStoreRequest {
            slug: "roast-works".to_owned(),
            name: "Roast Works".to_owned(),
            description: Some("Small-batch coffee by the bag or the case.".to_owned()),
            zip_code: "97201".to_owned(),
        },
    )
    .await?;
    let store_id = store.id.clone();

    let espresso = catalog::add_product(
        &seller_ctx,
        &pool,
        &store_id,
        CreateProductRequest {
            name: "Espresso Blend".to_owned(),
            description: Some("Dark roast, 12oz bags.".to_owned()),
            category_id: Some(coffee.id.as_str().to_owned()),
            prices: Some(json!([
                {"price": 14.0, "units": 1},
                {"price": 12.5, "units": 6},
                {"price": 11.0, "units": 12},
            ])),
        },
    )
    .await?;

    catalog::add_product(
        &seller_ctx,
        &pool,
        &store_id,
        CreateProductRequest {
            name: "Single Origin Sampler".to_owned(),
            description: None,
            category_id: Some(coffee.id.as_str().to_owned()),
            prices: Some(json!([
                {"price": 22.0, "units": 1},
                {"price": 19.0, "units": 4},
            ])),
        },
    )
    .await?;

    info!(store = %store.id, "store and products seeded");

    // One pending order at the 6-bag tier.
    let order = orders::place_order(
        &customer_ctx,
        &pool,
        CreateOrderRequest {
            product_id: espresso.id.as_str().to_owned(),
            units: 6,
        },
    )
    .await?;

    info!(order = %order.id, "order seeded");
    info!("Seeding complete!");
    Ok(())
}
