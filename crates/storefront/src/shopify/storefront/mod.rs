//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` request bodies and response envelopes with
//! `reqwest` 0.13 for HTTP. Product pages and non-search listing pages are
//! cached using `moka` (5-minute TTL).

mod cache;
mod conversions;

pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};
use waxworks_core::CartId;

use crate::config::{I18nContext, ShopifyStorefrontConfig};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};
use crate::shopify::types::{
    Cart, CartLineInput, CartUserError, ProductConnection, ProductDetail, ProductPageRequest,
    ProductSummary, ProductVariant, SelectedOption,
};

use cache::{CacheKey, CacheValue};
use conversions::{
    convert_cart, convert_product_connection, convert_product_detail, convert_user_error,
    convert_variant, merge_recommendations,
};
use queries::{
    AddToCart, CreateCart, GetCart, GetProductByHandle, GetProductRecommendations, GetProducts,
    GetVariantBySelectedOptions, Ping, add_to_cart, create_cart, get_cart, get_product_by_handle,
    get_product_recommendations, get_products, get_variant_by_selected_options, ping,
};

/// Number of best sellers fetched to pad the recommendation rail.
const RECOMMENDATION_PADDING: i64 = 12;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to products, listings, recommendations, and cart
/// mutations. Product pages and listing pages are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    i18n: I18nContext,
    cache: Cache<CacheKey, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyStorefrontConfig) -> Result<Self, ShopifyError> {
        Self::with_endpoint(config, config.endpoint())
    }

    /// Create a client that talks to `endpoint` instead of the store's own
    /// GraphQL URL (used against mock servers).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_endpoint(
        config: &ShopifyStorefrontConfig,
        endpoint: impl Into<String>,
    ) -> Result<Self, ShopifyError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                endpoint: endpoint.into(),
                access_token: config.storefront_private_token.expose_secret().to_string(),
                i18n: config.i18n.clone(),
                cache,
            }),
        })
    }

    fn country(&self) -> Option<String> {
        Some(self.inner.i18n.country.clone())
    }

    fn language(&self) -> Option<String> {
        Some(self.inner.i18n.language.clone())
    }

    /// Execute a GraphQL query.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header(
                "Shopify-Storefront-Private-Token",
                &self.inner.access_token,
            )
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError {
                message: format!("HTTP {status}: {}", truncate(&response_text, 200)),
                locations: vec![],
                path: vec![],
            }]));
        }

        let response: Response<Q::ResponseData> = serde_json::from_str(&response_text)
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    operation = request_body.operation_name,
                    body = %truncate(&response_text, 500),
                    "Failed to parse Shopify GraphQL response"
                );
            })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation = request_body.operation_name,
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                locations: vec![],
                path: vec![],
            }])
        })
    }

    /// Check that the API answers with the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<String, ShopifyError> {
        let data = self.execute::<Ping>(ping::Variables).await?;
        Ok(data.shop.name)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product, all of its variants, and the shop's policies.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if no product has this handle, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<ProductDetail, ShopifyError> {
        let cache_key = CacheKey::Product(handle.to_string());

        if let Some(CacheValue::Product(detail)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*detail);
        }

        let variables = get_product_by_handle::Variables {
            country: self.country(),
            language: self.language(),
            handle: handle.to_string(),
        };

        let data = self.execute::<GetProductByHandle>(variables).await?;

        let detail = convert_product_detail(data)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(detail.clone())))
            .await;

        Ok(detail)
    }

    /// Look up the variant of `handle` with these option values.
    ///
    /// Option names and values match case-insensitively and names the
    /// product does not have are ignored. `None` when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, selected_options), fields(handle = %handle))]
    pub async fn get_variant_by_selected_options(
        &self,
        handle: &str,
        selected_options: Vec<SelectedOption>,
    ) -> Result<Option<ProductVariant>, ShopifyError> {
        let variables = get_variant_by_selected_options::Variables {
            handle: handle.to_string(),
            selected_options,
            country: self.country(),
            language: self.language(),
        };

        let data = self.execute::<GetVariantBySelectedOptions>(variables).await?;

        Ok(data
            .product
            .and_then(|product| product.selected_variant)
            .map(convert_variant))
    }

    /// Get one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(sort = request.sort.key.as_str(), reverse = request.sort.reverse))]
    pub async fn get_products(
        &self,
        request: ProductPageRequest,
    ) -> Result<ProductConnection, ShopifyError> {
        // Search results are not cached
        let cache_key = request
            .query
            .is_none()
            .then(|| CacheKey::Products(request.clone()));

        if let Some(key) = &cache_key
            && let Some(CacheValue::Products(connection)) = self.inner.cache.get(key).await
        {
            debug!("Cache hit for products");
            return Ok(connection);
        }

        let variables = get_products::Variables {
            country: self.country(),
            language: self.language(),
            first: request.pagination.first,
            last: request.pagination.last,
            start_cursor: request.pagination.start_cursor,
            end_cursor: request.pagination.end_cursor,
            sort_key: Some(request.sort.key.as_str().to_string()),
            reverse: Some(request.sort.reverse),
            query: request.query,
        };

        let data = self.execute::<GetProducts>(variables).await?;
        let connection = convert_product_connection(data.products);

        if let Some(key) = cache_key {
            self.inner
                .cache
                .insert(key, CacheValue::Products(connection.clone()))
                .await;
        }

        Ok(connection)
    }

    /// Get products to recommend alongside the product with `handle`.
    ///
    /// Recommendations come first, padded with best sellers, without
    /// duplicates and without the product itself. Keyed by handle so it can
    /// run alongside [`Self::get_product_by_handle`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_recommendations(
        &self,
        handle: &str,
    ) -> Result<Vec<ProductSummary>, ShopifyError> {
        let variables = get_product_recommendations::Variables {
            handle: handle.to_string(),
            count: Some(RECOMMENDATION_PADDING),
            country: self.country(),
            language: self.language(),
        };

        let data = self.execute::<GetProductRecommendations>(variables).await?;

        Ok(merge_recommendations(
            data.recommended.unwrap_or_default(),
            data.additional.nodes,
            handle,
        ))
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Create a new cart holding `lines`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError> {
        let variables = create_cart::Variables {
            input: create_cart::CartInput { lines },
            country: self.country(),
            language: self.language(),
        };

        let data = self.execute::<CreateCart>(variables).await?;

        let payload = data.cart_create.ok_or_else(|| missing_payload("cartCreate"))?;
        cart_or_user_errors(payload.cart, payload.user_errors, "cartCreate")
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, ShopifyError> {
        let variables = get_cart::Variables {
            cart_id: cart_id.to_string(),
        };

        let data = self.execute::<GetCart>(variables).await?;

        data.cart
            .map(convert_cart)
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = add_to_cart::Variables {
            cart_id: cart_id.to_string(),
            lines,
            country: self.country(),
            language: self.language(),
        };

        let data = self.execute::<AddToCart>(variables).await?;

        let payload = data
            .cart_lines_add
            .ok_or_else(|| missing_payload("cartLinesAdd"))?;
        cart_or_user_errors(payload.cart, payload.user_errors, "cartLinesAdd")
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn missing_payload(mutation: &str) -> ShopifyError {
    ShopifyError::GraphQL(vec![GraphQLError {
        message: format!("{mutation} returned no payload"),
        locations: vec![],
        path: vec![],
    }])
}

fn cart_or_user_errors(
    cart: Option<queries::fragments::CartSummaryFields>,
    user_errors: Vec<queries::fragments::UserErrorFields>,
    mutation: &str,
) -> Result<Cart, ShopifyError> {
    let user_errors: Vec<CartUserError> = user_errors.into_iter().map(convert_user_error).collect();
    if let Some(error) = ShopifyError::from_user_errors(&user_errors) {
        return Err(error);
    }

    cart.map(convert_cart).ok_or_else(|| missing_payload(mutation))
}
