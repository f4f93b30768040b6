//! Newtype IDs for Shopify global identifiers.
//!
//! Shopify identifies every object with a global ID of the form
//! `gid://shopify/<Resource>/<id>`. Use the `define_gid!` macro to create
//! type-safe wrappers that prevent accidentally passing a product ID where a
//! variant ID is expected (e.g. as a cart line's merchandise).

/// Prefix shared by all Shopify global IDs.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Macro to define a type-safe Shopify global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `new()`, `parse()` (validates the resource segment), `as_str()`
/// - `Display`, `From<String>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use waxworks_core::define_gid;
/// define_gid!(ThingId, "Thing");
///
/// let id = ThingId::parse("gid://shopify/Thing/42").unwrap();
/// assert_eq!(id.resource_id(), Some("42"));
/// assert!(ThingId::parse("gid://shopify/Other/42").is_none());
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Shopify resource name carried in the ID.
            pub const RESOURCE: &'static str = $resource;

            /// Wrap a raw ID without validation.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parse an ID, accepting only `gid://shopify/<RESOURCE>/<id>`.
            #[must_use]
            pub fn parse(id: &str) -> Option<Self> {
                let rest = id.strip_prefix($crate::types::id::GID_PREFIX)?;
                let (resource, local) = rest.split_once('/')?;
                (resource == Self::RESOURCE && !local.is_empty()).then(|| Self(id.to_string()))
            }

            /// Get the full global ID.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The trailing resource-local part of the ID, if well-formed.
            #[must_use]
            pub fn resource_id(&self) -> Option<&str> {
                self.0.rsplit_once('/').map(|(_, local)| local)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_gid!(ProductId, "Product");
define_gid!(VariantId, "ProductVariant");
define_gid!(CartId, "Cart");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_matching_resource() {
        let id = VariantId::parse("gid://shopify/ProductVariant/4711").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/ProductVariant/4711");
        assert_eq!(id.resource_id(), Some("4711"));
    }

    #[test]
    fn test_parse_rejects_other_resource() {
        assert!(VariantId::parse("gid://shopify/Product/4711").is_none());
        assert!(ProductId::parse("gid://shopify/ProductVariant/4711").is_none());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CartId::parse("Cart/abc").is_none());
        assert!(CartId::parse("gid://shopify/Cart/").is_none());
    }

    #[test]
    fn test_cart_id_keeps_query_suffix() {
        // Cart IDs carry a key after the token; the ID must round-trip untouched
        let raw = "gid://shopify/Cart/c1-abc?key=def";
        let id = CartId::parse(raw).unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::new("gid://shopify/Product/1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/Product/1\"");
    }
}
