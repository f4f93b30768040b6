//! Shopify Storefront API client and domain types.
//!
//! # Architecture
//!
//! - Request bodies and response envelopes use the `graphql_client` types;
//!   the query documents live in [`storefront::queries`]
//! - Shopify is the source of truth - no local catalog, direct API calls
//! - In-memory caching via `moka` for product and listing responses (5 minute TTL)
//! - Cart mutations are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use waxworks_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify)?;
//!
//! // Critical data for a product page
//! let detail = client.get_product_by_handle("midnight-static-lp").await?;
//!
//! // Add the resolved variant to a new cart
//! let cart = client
//!     .create_cart(vec![CartLineInput::new(variant.id.clone(), Quantity::MIN)])
//!     .await?;
//! ```

pub mod storefront;
pub mod types;

pub use storefront::StorefrontClient;
pub use types::*;

use std::fmt;

use thiserror::Error;

/// Failures talking to the Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// The request never got a usable HTTP response (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with top-level GraphQL errors, or a non-2xx status.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The queried product or cart does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 429; carries the `Retry-After` seconds.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A cart mutation rejected its input (`userErrors`).
    #[error("User error: {0}")]
    UserError(String),
}

impl ShopifyError {
    /// Collapse a mutation's `userErrors` into one `UserError`, or `None`
    /// when the mutation succeeded.
    #[must_use]
    pub fn from_user_errors(errors: &[CartUserError]) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        let message = errors
            .iter()
            .map(|e| {
                e.code
                    .as_deref()
                    .map_or_else(|| e.message.clone(), |code| format!("{} ({code})", e.message))
            })
            .collect::<Vec<_>>()
            .join("; ");
        Some(Self::UserError(message))
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    pub message: String,
    pub locations: Vec<GraphQLErrorLocation>,
    /// Response path, keys as strings and list indices as numbers.
    pub path: Vec<serde_json::Value>,
}

/// 1-indexed position in the query document.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    pub line: i64,
    pub column: i64,
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if !self.message.is_empty() {
            parts.push(self.message.clone());
        }
        if !self.path.is_empty() {
            let path = self
                .path
                .iter()
                .map(|segment| segment.as_str().map_or_else(|| segment.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join(".");
            parts.push(format!("path: {path}"));
        }
        if let Some(location) = self.locations.first() {
            parts.push(format!("at line {}:{}", location.line, location.column));
        }
        f.write_str(&parts.join(" "))
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let text = e.to_string();
            if text.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                text
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("midnight-static-lp".to_string());
        assert_eq!(err.to_string(), "Not found: midnight-static-lp");
    }

    #[test]
    fn test_from_user_errors() {
        assert!(ShopifyError::from_user_errors(&[]).is_none());

        let errors = vec![
            CartUserError {
                code: Some("INVALID_MERCHANDISE_LINE".to_string()),
                field: Some(vec!["lines".to_string(), "0".to_string()]),
                message: "The merchandise line was not found".to_string(),
            },
            CartUserError {
                code: None,
                field: None,
                message: "Quantity too high".to_string(),
            },
        ];
        let err = ShopifyError::from_user_errors(&errors).expect("user error");
        assert_eq!(
            err.to_string(),
            "User error: The merchandise line was not found (INVALID_MERCHANDISE_LINE); Quantity too high"
        );
    }

    #[test]
    fn test_graphql_errors_joined() {
        let error = |message: &str| GraphQLError {
            message: message.to_string(),
            locations: vec![],
            path: vec![],
        };
        let err = ShopifyError::GraphQL(vec![error("Field 'artist' doesn't exist"), error("Throttled")]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field 'artist' doesn't exist; Throttled"
        );
        assert_eq!(
            ShopifyError::GraphQL(vec![]).to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_graphql_error_empty_messages() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("product".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: product.0 at line 5:10"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![],
            path: vec![],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
