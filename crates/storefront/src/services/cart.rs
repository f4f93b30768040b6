//! Add-to-cart for the product page.
//!
//! The caller passes the shopper's current cart, if any; a cart is created
//! on the first add. The returned cart's id is what the caller should keep.

use waxworks_core::{CartId, Quantity, VariantId};

use crate::shopify::types::{Cart, CartLineInput};
use crate::shopify::{ShopifyError, StorefrontClient};

/// Add `quantity` of `variant_id` as a single line.
///
/// # Errors
///
/// Returns `ShopifyError::UserError` when the cart rejects the line, or an
/// error if the API request fails.
#[tracing::instrument(skip(client), fields(variant_id = %variant_id, quantity = quantity.get()))]
pub async fn add_line(
    client: &StorefrontClient,
    cart_id: Option<&CartId>,
    variant_id: VariantId,
    quantity: Quantity,
) -> Result<Cart, ShopifyError> {
    let lines = vec![CartLineInput::new(variant_id, quantity)];
    match cart_id {
        Some(cart_id) => client.add_to_cart(cart_id, lines).await,
        None => client.create_cart(lines).await,
    }
}
