//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::instrument;
use waxworks_core::{ListingSort, Price, Quantity, is_on_sale};

use crate::error::Result;
use crate::filters;
use crate::services::listing::{self, ListingParams};
use crate::services::variants::{self, OptionChoices, Resolution, SelectedOptions};
use crate::services::{Deferred, params};
use crate::shopify::types::{
    Image, MediaContent, MediaItem, Money, ProductSummary, ProductVariant, ShopPolicy,
};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Image display data for templates.
#[derive(Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl ImageView {
    fn from_image(image: &Image, fallback_alt: &str) -> Self {
        Self {
            url: image.url.clone(),
            alt: image
                .alt_text
                .clone()
                .unwrap_or_else(|| fallback_alt.to_string()),
            width: image.width,
            height: image.height,
        }
    }
}

/// Price display data: current price, and the compare-at price when on sale.
#[derive(Clone)]
pub struct PriceView {
    pub price: String,
    pub compare_at_price: Option<String>,
    pub on_sale: bool,
}

impl PriceView {
    fn new(price: &Money, compare_at_price: Option<&Money>) -> Self {
        let current = price.to_price();
        let compare_at = compare_at_price.and_then(Money::to_price);
        let on_sale = is_on_sale(current.as_ref(), compare_at.as_ref());
        Self {
            price: current.map_or_else(|| price.amount.clone(), |p| p.display()),
            compare_at_price: compare_at.filter(|_| on_sale).as_ref().map(Price::display),
            on_sale,
        }
    }
}

/// Product card for grids and recommendation rails.
#[derive(Clone)]
pub struct ProductCardView {
    pub handle: String,
    pub title: String,
    pub vendor: String,
    pub price: Option<PriceView>,
    pub image: Option<ImageView>,
}

impl From<&ProductSummary> for ProductCardView {
    fn from(product: &ProductSummary) -> Self {
        let variant = product.first_variant.as_ref();
        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            vendor: product.vendor.clone(),
            price: variant.map(|v| PriceView::new(&v.price, v.compare_at_price.as_ref())),
            image: variant
                .and_then(|v| v.image.as_ref())
                .map(|img| ImageView::from_image(img, &product.title)),
        }
    }
}

/// The variant being shown on the detail page.
#[derive(Clone)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub sku: Option<String>,
    pub available: bool,
    pub price: PriceView,
    pub unit_price: Option<String>,
    pub image: Option<ImageView>,
}

impl VariantView {
    fn new(variant: &ProductVariant, product_title: &str) -> Self {
        Self {
            id: variant.id.to_string(),
            title: variant.title.clone(),
            sku: variant.sku.clone(),
            available: variant.available_for_sale,
            price: PriceView::new(&variant.price, variant.compare_at_price.as_ref()),
            unit_price: variant
                .unit_price
                .as_ref()
                .and_then(Money::to_price)
                .map(|p| p.display()),
            image: variant
                .image
                .as_ref()
                .map(|img| ImageView::from_image(img, product_title)),
        }
    }
}

/// Hosted video sources and poster frame.
#[derive(Clone)]
pub struct VideoView {
    /// `(url, mime type)` pairs.
    pub sources: Vec<(String, String)>,
    pub poster: Option<String>,
}

/// YouTube or Vimeo embed.
#[derive(Clone)]
pub struct EmbedView {
    pub url: String,
    pub title: String,
}

/// Gallery entry.
#[derive(Clone)]
pub enum MediaView {
    Image(ImageView),
    Video(VideoView),
    Embed(EmbedView),
}

impl MediaView {
    fn from_media(media: &MediaItem, product_title: &str) -> Option<Self> {
        match &media.content {
            MediaContent::Image(image) => {
                Some(Self::Image(ImageView::from_image(image, product_title)))
            }
            MediaContent::Video(sources) => Some(Self::Video(VideoView {
                sources: sources
                    .iter()
                    .map(|s| (s.url.clone(), s.mime_type.clone()))
                    .collect(),
                poster: media.preview_image.as_ref().map(|p| p.url.clone()),
            })),
            MediaContent::ExternalVideo { embed_url } => Some(Self::Embed(EmbedView {
                url: embed_url.clone(),
                title: media
                    .alt
                    .clone()
                    .unwrap_or_else(|| product_title.to_string()),
            })),
            // 3D models only get their preview image
            MediaContent::Model3d => media
                .preview_image
                .as_ref()
                .map(|p| Self::Image(ImageView::from_image(p, product_title))),
        }
    }
}

/// Sort menu entry.
#[derive(Clone)]
pub struct SortLink {
    pub label: &'static str,
    pub link: String,
    pub active: bool,
}

fn sort_links(path: &str, query: Option<&str>, current: ListingSort) -> Vec<SortLink> {
    ListingSort::ALL
        .into_iter()
        .map(|sort| {
            let mut pairs = params::parse(query);
            // A new sort starts from the first page
            pairs.retain(|(name, _)| name != "cursor" && name != "direction" && name != "sort");
            if let Some(value) = sort.as_param() {
                pairs.push(("sort".to_string(), value.to_string()));
            }
            SortLink {
                label: sort.label(),
                link: params::location(path, &pairs),
                active: sort == current,
            }
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub search: String,
    pub filter: String,
    pub sort: String,
    /// Current page window; the filter form keeps the shopper on this page.
    pub cursor: String,
    pub direction: &'static str,
    pub sort_links: Vec<SortLink>,
    pub next_link: Option<String>,
    pub previous_link: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub handle: String,
    pub title: String,
    pub vendor: String,
    pub artist_name: Option<String>,
    pub description_html: String,
    pub seo_title: String,
    pub seo_description: String,
    pub media: Vec<MediaView>,
    pub variant: VariantView,
    pub options: Vec<OptionChoices>,
    pub quantity: Quantity,
    pub shop_name: String,
    pub shipping_policy: Option<ShopPolicy>,
    pub refund_policy: Option<ShopPolicy>,
    pub recommendations: Deferred<Vec<ProductCardView>>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display product listing page.
#[instrument(skip(state, uri))]
pub async fn index(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> Result<Response> {
    let query = uri.query();
    let listing_params = ListingParams::from_query(query);

    let page = listing::load_listing(
        state.storefront(),
        &listing_params,
        state.config().page_size,
        uri.path(),
        query,
    )
    .await?;

    Ok(ProductsIndexTemplate {
        products: page.products.iter().map(ProductCardView::from).collect(),
        search: listing_params.search.clone().unwrap_or_default(),
        filter: listing_params.filter.clone().unwrap_or_default(),
        sort: listing_params.sort.as_param().unwrap_or_default().to_string(),
        cursor: listing_params.cursor.clone().unwrap_or_default(),
        direction: listing_params.direction.as_param(),
        sort_links: sort_links(uri.path(), query, listing_params.sort),
        next_link: page.next_link,
        previous_link: page.previous_link,
    }
    .into_response())
}

/// Display product detail page.
///
/// The product (critical) and the recommendation rail (deferred) are fetched
/// together; only the product can fail the page.
#[instrument(skip(state, uri), fields(handle = %handle))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response> {
    let storefront = state.storefront();
    let (detail, recommendations) = tokio::join!(
        storefront.get_product_by_handle(&handle),
        storefront.get_product_recommendations(&handle),
    );

    // A missing handle surfaces as `ShopifyError::NotFound`, rendered as 404
    let detail = detail?;
    let product = &detail.product;

    let query = uri.query();
    let selected = SelectedOptions::from_query_string(query);
    let unlisted;
    let variant = match variants::resolve(product, &selected, uri.path(), query)? {
        Resolution::Selected(variant) => variant,
        Resolution::Redirect(location) => {
            // Only the first page of variants is fetched with the product
            let found = match variants::unlisted_selection(product, &selected) {
                Some(selection) => {
                    storefront
                        .get_variant_by_selected_options(&handle, selection)
                        .await?
                }
                None => None,
            };
            match found {
                Some(variant) => {
                    unlisted = variant;
                    &unlisted
                }
                None => {
                    return Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response());
                }
            }
        }
    };

    let recommendations = Deferred::capture("recommendations", recommendations)
        .map(|products| products.iter().map(ProductCardView::from).collect());

    Ok(ProductShowTemplate {
        handle: product.handle.clone(),
        title: product.title.clone(),
        vendor: product.vendor.clone(),
        artist_name: product.artist_name.clone(),
        description_html: product.description_html.clone(),
        seo_title: product
            .seo
            .title
            .clone()
            .unwrap_or_else(|| format!("{} | {}", product.title, detail.shop.name)),
        seo_description: product
            .seo
            .description
            .clone()
            .unwrap_or_else(|| product.description.chars().take(160).collect()),
        media: product
            .media
            .iter()
            .filter_map(|m| MediaView::from_media(m, &product.title))
            .collect(),
        variant: VariantView::new(variant, &product.title),
        options: variants::option_choices(product, variant, uri.path(), query),
        quantity: Quantity::MIN,
        shop_name: detail.shop.name.clone(),
        shipping_policy: detail.shop.shipping_policy.clone(),
        refund_policy: detail.shop.refund_policy.clone(),
        recommendations,
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(amount: &str, currency_code: &str) -> Money {
        Money {
            amount: amount.to_string(),
            currency_code: currency_code.to_string(),
        }
    }

    fn usd(amount: &str) -> Money {
        money(amount, "USD")
    }

    #[test]
    fn test_price_view_on_sale() {
        let view = PriceView::new(&usd("10.00"), Some(&usd("15.00")));
        assert!(view.on_sale);
        assert_eq!(view.price, "$10");
        assert_eq!(view.compare_at_price.as_deref(), Some("$15"));
    }

    #[test]
    fn test_price_view_on_sale_in_unlisted_currency() {
        let view = PriceView::new(&money("10.00", "CHF"), Some(&money("15.00", "CHF")));
        assert!(view.on_sale);
        assert_eq!(view.price, "CHF 10");
        assert_eq!(view.compare_at_price.as_deref(), Some("CHF 15"));
    }

    #[test]
    fn test_price_view_hides_equal_compare_at() {
        let view = PriceView::new(&usd("10.00"), Some(&usd("10.00")));
        assert!(!view.on_sale);
        assert!(view.compare_at_price.is_none());
    }

    #[test]
    fn test_sort_links_reset_cursor() {
        let links = sort_links(
            "/products",
            Some("search=jazz&sort=newest&cursor=abc&direction=next"),
            ListingSort::Newest,
        );
        let newest = links.iter().find(|l| l.label == "Newest");
        assert!(newest.is_some_and(|l| l.active && l.link == "/products?search=jazz&sort=newest"));
        let relevance = links.iter().find(|l| l.label == "Relevance");
        assert!(relevance.is_some_and(|l| !l.active && l.link == "/products?search=jazz"));
    }
}
