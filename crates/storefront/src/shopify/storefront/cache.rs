//! Cache types for Storefront API responses.

use crate::shopify::types::{ProductConnection, ProductDetail, ProductPageRequest};

/// Cache key for product pages and listing pages.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    Products(ProductPageRequest),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<ProductDetail>),
    Products(ProductConnection),
}
