//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod price_tiers;
pub mod status;
pub mod zipcode;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price_tiers::{PriceTier, PriceTierError, PriceTierSet};
pub use status::*;
pub use zipcode::{ZipCode, ZipCodeError};
