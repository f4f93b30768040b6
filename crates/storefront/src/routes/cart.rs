//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart id lives in the session; handlers read it there and pass it on
//! explicitly.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use waxworks_core::{CartId, Quantity, QuantityStep, VariantId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CART_ID_KEY;
use crate::services::cart;
use crate::shopify::ShopifyError;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart ID from the session.
async fn get_cart_id(session: &Session) -> Option<CartId> {
    session
        .get::<CartId>(CART_ID_KEY)
        .await
        .inspect_err(|e| tracing::warn!("Failed to read cart ID from session: {e}"))
        .ok()
        .flatten()
}

/// Set the cart ID in the session.
async fn set_cart_id(
    session: &Session,
    cart_id: &CartId,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(CART_ID_KEY, cart_id).await
}

fn badge_count(total_quantity: i64) -> u32 {
    u32::try_from(total_quantity).unwrap_or(0)
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: String,
    pub quantity: Option<u32>,
}

/// Quantity counter form data.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub quantity: Option<u32>,
    pub step: QuantityStep,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Quantity counter fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/quantity.html")]
pub struct QuantityTemplate {
    pub quantity: Quantity,
}

/// Inline add-to-cart error fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_error.html")]
pub struct CartErrorTemplate {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Add a variant to the cart (HTMX).
///
/// Creates a new cart if the session has none, or adds to the existing one.
/// Returns the cart count badge with an HTMX trigger so other elements can
/// refresh. Lines the cart rejects come back as an inline error (422).
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let variant_id = VariantId::parse(form.variant_id.trim())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid variant id: {}", form.variant_id)))?;
    let quantity = Quantity::new(form.quantity.unwrap_or(1));
    let cart_id = get_cart_id(&session).await;

    let result = cart::add_line(state.storefront(), cart_id.as_ref(), variant_id.clone(), quantity).await;

    let cart = match result {
        Ok(cart) => cart,
        Err(ShopifyError::UserError(message)) => {
            tracing::warn!(variant_id = %variant_id, "Cart rejected line: {message}");
            return Ok((
                axum::http::StatusCode::UNPROCESSABLE_ENTITY,
                CartErrorTemplate { message },
            )
                .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    if cart_id.as_ref() != Some(&cart.id) {
        set_cart_id(&session, &cart.id).await?;
    }

    add_breadcrumb("cart", "Added to cart", Some(&[("variant_id", variant_id.as_str())]));

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: badge_count(cart.total_quantity),
        },
    )
        .into_response())
}

/// Step the quantity counter (HTMX).
///
/// Stateless: the current value comes from the form, the new value is
/// rendered back. It never goes below 1.
#[instrument]
pub async fn quantity(Form(form): Form<QuantityForm>) -> impl IntoResponse {
    let current = Quantity::new(form.quantity.unwrap_or(1));
    QuantityTemplate {
        quantity: current.step(form.step),
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let count = match get_cart_id(&session).await {
        Some(cart_id) => state
            .storefront()
            .get_cart(&cart_id)
            .await
            .map(|cart| badge_count(cart.total_quantity))
            .inspect_err(|e| tracing::warn!("Failed to fetch cart {cart_id}: {e}"))
            .unwrap_or(0),
        None => 0,
    };

    CartCountTemplate { count }
}

/// Redirect to Shopify checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let Some(cart_id) = get_cart_id(&session).await else {
        // No cart yet, back to the catalogue
        return Redirect::to("/products").into_response();
    };

    match state.storefront().get_cart(&cart_id).await {
        Ok(cart) => Redirect::to(&cart.checkout_url).into_response(),
        Err(e) => {
            tracing::error!("Failed to get cart for checkout: {e}");
            Redirect::to("/products").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_count_clamps_negative() {
        assert_eq!(badge_count(-1), 0);
        assert_eq!(badge_count(3), 3);
    }

    #[tokio::test]
    async fn test_quantity_decrement_at_one_stays_one() {
        let form = QuantityForm {
            quantity: Some(1),
            step: QuantityStep::Decrement,
        };
        let response = quantity(Form(form)).await.into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("value=\"1\""));
        assert!(html.contains("disabled"));
    }
}
