//! Waxworks Core - Shared domain types.
//!
//! This crate provides the types shared by the Waxworks storefront:
//! - Shopify global IDs (`gid://shopify/...`) as distinct newtypes
//! - Prices and the on-sale comparison
//! - The purchase quantity counter
//! - Listing sort parameters and their backend sort specification
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Everything here can be unit tested without a runtime.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
