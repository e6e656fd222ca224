//! Bazaar Backend - Marketplace persistence, validation, and services.
//!
//! This library implements the marketplace backend behind whatever transport
//! the deployment puts in front of it. HTTP routing, page rendering, session
//! handling, file storage, and email delivery are external collaborators and
//! deliberately absent.
//!
//! # Architecture
//!
//! - [`db`] - `PostgreSQL` repositories, the unique-identifier allocator, and
//!   the repository error taxonomy
//! - [`models`] - Validated domain types, separate from database rows
//! - [`requests`] - Input schemas validated at the boundary into domain
//!   values, and response shapes
//! - [`services`] - Request-scoped orchestration: authorization checks,
//!   validation, persistence
//! - [`config`] - Environment-based configuration
//!
//! # Multi-tenancy
//!
//! Stores are the tenants. Sellers own stores; products and orders hang off
//! a store, and every mutation checks either store ownership or the admin
//! role before touching rows.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod requests;
pub mod services;

pub use error::AppError;
