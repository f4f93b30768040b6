//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod products;

pub use cart::{convert_cart, convert_user_error};
pub use products::{
    convert_product_card, convert_product_connection, convert_product_detail, convert_variant,
    merge_recommendations,
};
