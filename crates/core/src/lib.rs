//! Mealcart Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront library, its
//! binary, and the integration tests:
//!
//! - [`Email`] - validated email address
//! - [`MealId`] - catalog identifier of a meal
//! - [`Price`] - decimal price with currency
//! - [`Product`] - a meal as listed by the catalog
//! - [`SessionRecord`] - the logged-in visitor stored under the `user` key
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! storage backends. This keeps it lightweight and allows it to be used
//! anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
