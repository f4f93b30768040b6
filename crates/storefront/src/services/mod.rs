//! Business logic services for storefront.
//!
//! # Services
//!
//! - `variants` - Variant selection from query parameters, option picker
//! - `listing` - Listing sort, cursor pagination, title filter
//! - `cart` - Add-to-cart (create or extend the shopper's cart)
//! - `deferred` - Independently failable page sections

pub mod cart;
pub mod deferred;
pub mod listing;
pub mod params;
pub mod variants;

pub use deferred::Deferred;
