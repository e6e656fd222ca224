//! Request-scoped services: authorization, validation, persistence.
//!
//! Each function here is one operation an external transport would expose.
//! The acting account arrives as an explicit [`RequestContext`] - never as
//! ambient global state - and the two authorization rules of the platform
//! are applied up front: the `admin` role bypasses ownership, and every
//! store-scoped mutation requires the caller to own the store.

pub mod accounts;
pub mod catalog;
pub mod context;
pub mod orders;
pub mod stores;

pub use context::RequestContext;
