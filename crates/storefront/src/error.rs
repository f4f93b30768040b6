//! Request-level errors.
//!
//! Handlers return [`Result`]; anything that escapes a handler is turned into
//! a status code and a short, client-safe message. Server-side failures are
//! reported to Sentry on the way out.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::shopify::ShopifyError;

/// Everything a storefront handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storefront API call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The request itself is malformed (e.g. a variant id that is not a GID).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session: {err}"))
    }
}

impl AppError {
    /// Status code this error renders with.
    ///
    /// A missing product or cart is a 404 wherever it is detected; a rejected
    /// cart line is the shopper's problem (422); any other API failure is a
    /// bad gateway.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::Shopify(ShopifyError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Shopify(ShopifyError::UserError(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the shopper.
    fn public_message(&self) -> String {
        match self {
            Self::NotFound(_) | Self::Shopify(ShopifyError::NotFound(_)) => "Not found".to_string(),
            Self::BadRequest(_) => self.to_string(),
            Self::Shopify(ShopifyError::UserError(message)) => message.clone(),
            Self::Shopify(_) => "The shop is not responding right now. Please try again.".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                status = status.as_u16(),
                sentry_event_id = %event_id,
                "Request failed"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, self.public_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a shopper action for Sentry's breadcrumb trail.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("variant_id", variant_id.as_str())]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let data = data
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value)))
        .collect();

    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data,
        ..Default::default()
    });
}
