//! Core types for Mealcart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod session;

pub use email::{Email, EmailError};
pub use id::MealId;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::Product;
pub use session::SessionRecord;
