//! Domain types for Shopify Storefront API.
//!
//! What the rest of the storefront sees of the API. Raw response shapes stay
//! in `storefront::queries`; `storefront::conversions` maps between them.

use serde::{Deserialize, Serialize};
use waxworks_core::{CartId, Price, ProductId, Quantity, SortSpec, VariantId};

// =============================================================================
// Money Types
// =============================================================================

/// Money as the API sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal string, e.g. `"24.99"`.
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Parse into a decimal [`Price`].
    ///
    /// Returns `None` (and logs) when the amount or currency is unusable.
    #[must_use]
    pub fn to_price(&self) -> Option<Price> {
        Price::parse(&self.amount, &self.currency_code)
            .inspect_err(|e| tracing::warn!(error = %e, "Unparseable money value"))
            .ok()
    }
}

// =============================================================================
// Media Types
// =============================================================================

/// Image hosted on the Shopify CDN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// A playable source of a hosted video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub url: String,
    pub mime_type: String,
}

/// What a media item actually is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaContent {
    Image(Image),
    Video(Vec<VideoSource>),
    ExternalVideo { embed_url: String },
    Model3d,
}

/// One entry of a product's media gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub alt: Option<String>,
    pub preview_image: Option<Image>,
    pub content: MediaContent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seo {
    pub title: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Name/value pair fixing one option of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Format", "Color").
    pub name: String,
    /// Selected value (e.g., "Vinyl", "Red").
    pub value: String,
}

/// An option a product varies by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Format").
    pub name: String,
    /// Available values in display order (e.g., `["Vinyl", "CD", "Cassette"]`).
    pub values: Vec<String>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    pub sku: Option<String>,
    pub price: Money,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Money>,
    /// Price per unit of measure, when the merchant sets one.
    pub unit_price: Option<Money>,
    /// One value per product option.
    pub selected_options: Vec<SelectedOption>,
    pub image: Option<Image>,
}

/// A product with everything the detail page needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub vendor: String,
    /// Artist credited on the release (from the `custom.artistname` metafield).
    pub artist_name: Option<String>,
    pub description: String,
    pub description_html: String,
    pub seo: Seo,
    /// Options in display order.
    pub options: Vec<ProductOption>,
    /// Variants in backend order; the first is the default selection.
    pub variants: Vec<ProductVariant>,
    /// The product has more variants than `variants` holds.
    pub has_more_variants: bool,
    pub media: Vec<MediaItem>,
}

/// Compact product data for listing grids and recommendation rails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub vendor: String,
    pub published_at: Option<String>,
    /// First variant, used for the card's price and image.
    pub first_variant: Option<ProductVariant>,
}

// =============================================================================
// Shop Types
// =============================================================================

/// A store policy shown on product pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopPolicy {
    pub handle: String,
    /// Policy body (HTML).
    pub body: String,
}

/// Store-level information returned alongside the product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    pub primary_domain_url: String,
    pub shipping_policy: Option<ShopPolicy>,
    pub refund_policy: Option<ShopPolicy>,
}

/// Critical data for the product detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    pub shop: Shop,
}

// =============================================================================
// Pagination Types
// =============================================================================

/// Relay page info; cursors are present whenever the page is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// One page of product cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConnection {
    pub products: Vec<ProductSummary>,
    pub page_info: PageInfo,
}

/// Connection window arguments (`first`/`after` or `last`/`before`).
///
/// Cursors are opaque; they are only ever echoed back to the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PaginationVariables {
    pub first: Option<i64>,
    pub last: Option<i64>,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Everything needed to fetch one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductPageRequest {
    pub pagination: PaginationVariables,
    pub sort: SortSpec,
    /// Free-text search passed to the API's `query` argument.
    pub query: Option<String>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// The slice of cart state the storefront needs after a mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub checkout_url: String,
    /// Sum of line quantities, shown in the cart badge.
    pub total_quantity: i64,
}

/// `CartLineInput` as sent to `cartCreate` and `cartLinesAdd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Variant being bought.
    pub merchandise_id: VariantId,
    pub quantity: i64,
}

impl CartLineInput {
    /// A single line for the given variant and quantity.
    #[must_use]
    pub fn new(merchandise_id: VariantId, quantity: Quantity) -> Self {
        Self {
            merchandise_id,
            quantity: i64::from(quantity),
        }
    }
}

/// Entry of a cart mutation's `userErrors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUserError {
    pub code: Option<String>,
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_money_to_price() {
        let money = Money {
            amount: "24.99".to_string(),
            currency_code: "USD".to_string(),
        };
        assert_eq!(money.to_price().unwrap().display(), "$24.99");

        let bad = Money {
            amount: "n/a".to_string(),
            currency_code: "USD".to_string(),
        };
        assert!(bad.to_price().is_none());
    }

    #[test]
    fn test_cart_line_input_serializes_camel_case() {
        let line = CartLineInput::new(
            VariantId::new("gid://shopify/ProductVariant/7"),
            Quantity::new(3),
        );
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "merchandiseId": "gid://shopify/ProductVariant/7",
                "quantity": 3
            })
        );
    }
}
