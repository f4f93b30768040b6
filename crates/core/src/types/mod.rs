//! Core types for Waxworks.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod quantity;
pub mod sort;

pub use id::*;
pub use price::{CurrencyCode, Price, PriceError, is_on_sale};
pub use quantity::{Quantity, QuantityStep};
pub use sort::{ListingSort, SortKey, SortSpec};
