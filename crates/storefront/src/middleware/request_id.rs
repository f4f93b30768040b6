//! Request ID middleware for request tracing and correlation.
//!
//! Each request carries an `x-request-id`: the one set by an upstream proxy
//! when it looks sane, otherwise a fresh UUID v4. The id is recorded in the
//! current tracing span, tagged on the Sentry scope, and echoed in the
//! response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id that is trusted.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Upstream id, if present and made of printable ASCII.
fn upstream_request_id(request: &Request) -> Option<String> {
    let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let valid = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());
    valid.then(|| value.to_string())
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(id: &str) -> Request {
        axum::http::Request::builder()
            .header(REQUEST_ID_HEADER, id)
            .body(Body::empty())
            .unwrap_or_default()
    }

    #[test]
    fn test_upstream_id_accepted() {
        assert_eq!(
            upstream_request_id(&request_with("cf-8a1b2c3d")).as_deref(),
            Some("cf-8a1b2c3d")
        );
    }

    #[test]
    fn test_upstream_id_rejected_when_oversized() {
        assert!(upstream_request_id(&request_with(&"a".repeat(MAX_REQUEST_ID_LEN + 1))).is_none());
        assert!(upstream_request_id(&request_with("has space")).is_none());
    }
}
