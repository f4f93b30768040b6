//! GraphQL query definitions for Shopify Storefront API.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`], paired with
//! a module holding its document, `Variables` and `ResponseData`. Response
//! structs mirror the selection sets exactly; conversion into domain types
//! happens in `conversions`.

use graphql_client::{GraphQLQuery, QueryBody};

macro_rules! variant_fragment {
    () => {
        r"
fragment ProductVariant on ProductVariant {
  id
  title
  availableForSale
  sku
  selectedOptions { name value }
  image { id url altText width height }
  price { amount currencyCode }
  compareAtPrice { amount currencyCode }
  unitPrice { amount currencyCode }
}
"
    };
}

macro_rules! media_fragment {
    () => {
        r"
fragment Media on Media {
  __typename
  mediaContentType
  alt
  previewImage { url }
  ... on MediaImage { id image { id url width height altText } }
  ... on Video { id sources { mimeType url } }
  ... on Model3d { id }
  ... on ExternalVideo { id embedUrl }
}
"
    };
}

macro_rules! product_card_fragment {
    () => {
        r"
fragment ProductCard on Product {
  id
  title
  publishedAt
  handle
  vendor
  variants(first: 1) { nodes { ...ProductVariant } }
}
"
    };
}

macro_rules! cart_fragment {
    () => {
        r"
fragment CartSummary on Cart {
  id
  checkoutUrl
  totalQuantity
}
"
    };
}

macro_rules! impl_query {
    ($name:ident, $module:ident) => {
        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

/// Response shapes shared by several operations.
pub mod fragments {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Nodes<T> {
        pub nodes: Vec<T>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyFields {
        pub amount: String,
        pub currency_code: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ImageFields {
        pub id: Option<String>,
        pub url: String,
        pub alt_text: Option<String>,
        pub width: Option<i64>,
        pub height: Option<i64>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SelectedOptionFields {
        pub name: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantFields {
        pub id: String,
        pub title: String,
        pub available_for_sale: bool,
        pub sku: Option<String>,
        pub selected_options: Vec<SelectedOptionFields>,
        pub image: Option<ImageFields>,
        pub price: MoneyFields,
        pub compare_at_price: Option<MoneyFields>,
        pub unit_price: Option<MoneyFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCardFields {
        pub id: String,
        pub title: String,
        pub published_at: Option<String>,
        pub handle: String,
        pub vendor: String,
        pub variants: Nodes<ProductVariantFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageInfoFields {
        pub has_previous_page: bool,
        pub has_next_page: bool,
        pub start_cursor: Option<String>,
        pub end_cursor: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartSummaryFields {
        pub id: String,
        pub checkout_url: String,
        pub total_quantity: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct UserErrorFields {
        pub code: Option<String>,
        pub field: Option<Vec<String>>,
        pub message: String,
    }
}

// =============================================================================
// Product queries
// =============================================================================

/// Critical data for the product page: product, all variants, shop policies.
pub struct GetProductByHandle;
impl_query!(GetProductByHandle, get_product_by_handle);

pub mod get_product_by_handle {
    use serde::{Deserialize, Serialize};

    use super::fragments::{ImageFields, Nodes, ProductVariantFields};

    pub const OPERATION_NAME: &str = "Product";
    pub const QUERY: &str = concat!(
        r#"
query Product(
  $country: CountryCode
  $language: LanguageCode
  $handle: String!
) @inContext(country: $country, language: $language) {
  product(handle: $handle) {
    id
    title
    vendor
    handle
    descriptionHtml
    description
    options { name optionValues { name } }
    media(first: 7) { nodes { ...Media } }
    variants(first: 250) {
      nodes { ...ProductVariant }
      pageInfo { hasNextPage }
    }
    seo { description title }
    artistName: metafield(namespace: "custom", key: "artistname") { value }
  }
  shop {
    name
    primaryDomain { url }
    shippingPolicy { body handle }
    refundPolicy { body handle }
  }
}
"#,
        media_fragment!(),
        variant_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub country: Option<String>,
        pub language: Option<String>,
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductFields>,
        pub shop: ShopFields,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductFields {
        pub id: String,
        pub title: String,
        pub vendor: String,
        pub handle: String,
        pub description_html: String,
        pub description: String,
        pub options: Vec<OptionFields>,
        pub media: Nodes<MediaFields>,
        pub variants: VariantConnection,
        pub seo: SeoFields,
        pub artist_name: Option<MetafieldFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantConnection {
        pub nodes: Vec<ProductVariantFields>,
        pub page_info: VariantPageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantPageInfo {
        pub has_next_page: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OptionFields {
        pub name: String,
        pub option_values: Vec<OptionValueFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct OptionValueFields {
        pub name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct UrlFields {
        pub url: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VideoSourceFields {
        pub mime_type: String,
        pub url: String,
    }

    /// `Media` is an interface; `__typename` selects the concrete fields.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(tag = "__typename")]
    pub enum MediaFields {
        #[serde(rename_all = "camelCase")]
        MediaImage {
            id: String,
            alt: Option<String>,
            preview_image: Option<UrlFields>,
            image: Option<ImageFields>,
        },
        #[serde(rename_all = "camelCase")]
        Video {
            id: String,
            alt: Option<String>,
            preview_image: Option<UrlFields>,
            sources: Vec<VideoSourceFields>,
        },
        #[serde(rename_all = "camelCase")]
        ExternalVideo {
            id: String,
            alt: Option<String>,
            preview_image: Option<UrlFields>,
            embed_url: String,
        },
        #[serde(rename_all = "camelCase")]
        Model3d {
            id: String,
            alt: Option<String>,
            preview_image: Option<UrlFields>,
        },
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SeoFields {
        pub title: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MetafieldFields {
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ShopFields {
        pub name: String,
        pub primary_domain: UrlFields,
        pub shipping_policy: Option<PolicyFields>,
        pub refund_policy: Option<PolicyFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct PolicyFields {
        pub body: String,
        pub handle: String,
    }
}

/// A single variant picked server-side by its option values.
///
/// Used when the product has more variants than the product query fetches.
pub struct GetVariantBySelectedOptions;
impl_query!(GetVariantBySelectedOptions, get_variant_by_selected_options);

pub mod get_variant_by_selected_options {
    use serde::{Deserialize, Serialize};

    use super::fragments::ProductVariantFields;
    use crate::shopify::types::SelectedOption;

    pub const OPERATION_NAME: &str = "VariantBySelectedOptions";
    pub const QUERY: &str = concat!(
        r"
query VariantBySelectedOptions(
  $handle: String!
  $selectedOptions: [SelectedOptionInput!]!
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  product(handle: $handle) {
    selectedVariant: variantBySelectedOptions(
      selectedOptions: $selectedOptions
      ignoreUnknownOptions: true
      caseInsensitiveMatch: true
    ) { ...ProductVariant }
  }
}
",
        variant_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub selected_options: Vec<SelectedOption>,
        pub country: Option<String>,
        pub language: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductFields {
        pub selected_variant: Option<ProductVariantFields>,
    }
}

/// One page of the product listing.
pub struct GetProducts;
impl_query!(GetProducts, get_products);

pub mod get_products {
    use serde::{Deserialize, Serialize};

    use super::fragments::{PageInfoFields, ProductCardFields};

    pub const OPERATION_NAME: &str = "AllProducts";
    pub const QUERY: &str = concat!(
        r"
query AllProducts(
  $country: CountryCode
  $language: LanguageCode
  $first: Int
  $last: Int
  $startCursor: String
  $endCursor: String
  $sortKey: ProductSortKeys
  $reverse: Boolean
  $query: String
) @inContext(country: $country, language: $language) {
  products(
    first: $first
    last: $last
    before: $startCursor
    after: $endCursor
    sortKey: $sortKey
    reverse: $reverse
    query: $query
  ) {
    nodes { ...ProductCard }
    pageInfo { hasPreviousPage hasNextPage startCursor endCursor }
  }
}
",
        product_card_fragment!(),
        variant_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub country: Option<String>,
        pub language: Option<String>,
        pub first: Option<i64>,
        pub last: Option<i64>,
        pub start_cursor: Option<String>,
        pub end_cursor: Option<String>,
        pub sort_key: Option<String>,
        pub reverse: Option<bool>,
        pub query: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: ProductsConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductsConnection {
        pub nodes: Vec<ProductCardFields>,
        pub page_info: PageInfoFields,
    }
}

/// Recommendations plus best sellers for the "You may also like" rail.
pub struct GetProductRecommendations;
impl_query!(GetProductRecommendations, get_product_recommendations);

pub mod get_product_recommendations {
    use serde::{Deserialize, Serialize};

    use super::fragments::{Nodes, ProductCardFields};

    pub const OPERATION_NAME: &str = "productRecommendations";
    pub const QUERY: &str = concat!(
        r"
query productRecommendations(
  $handle: String!
  $count: Int
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  recommended: productRecommendations(productHandle: $handle) { ...ProductCard }
  additional: products(first: $count, sortKey: BEST_SELLING) {
    nodes { ...ProductCard }
  }
}
",
        product_card_fragment!(),
        variant_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub count: Option<i64>,
        pub country: Option<String>,
        pub language: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub recommended: Option<Vec<ProductCardFields>>,
        pub additional: Nodes<ProductCardFields>,
    }
}

/// Cheapest possible round trip, used by the readiness probe.
pub struct Ping;
impl_query!(Ping, ping);

pub mod ping {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "Ping";
    pub const QUERY: &str = "query Ping { shop { name } }";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub shop: Shop,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Shop {
        pub name: String,
    }
}

// =============================================================================
// Cart operations
// =============================================================================

pub struct GetCart;
impl_query!(GetCart, get_cart);

pub mod get_cart {
    use serde::{Deserialize, Serialize};

    use super::fragments::CartSummaryFields;

    pub const OPERATION_NAME: &str = "GetCart";
    pub const QUERY: &str = concat!(
        r"
query GetCart($cartId: ID!) {
  cart(id: $cartId) { ...CartSummary }
}
",
        cart_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartSummaryFields>,
    }
}

pub struct CreateCart;
impl_query!(CreateCart, create_cart);

pub mod create_cart {
    use serde::{Deserialize, Serialize};

    use super::fragments::{CartSummaryFields, UserErrorFields};
    use crate::shopify::types::CartLineInput;

    pub const OPERATION_NAME: &str = "CreateCart";
    pub const QUERY: &str = concat!(
        r"
mutation CreateCart(
  $input: CartInput!
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  cartCreate(input: $input) {
    cart { ...CartSummary }
    userErrors { code field message }
  }
}
",
        cart_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
        pub country: Option<String>,
        pub language: Option<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct CartInput {
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub cart: Option<CartSummaryFields>,
        pub user_errors: Vec<UserErrorFields>,
    }
}

pub struct AddToCart;
impl_query!(AddToCart, add_to_cart);

pub mod add_to_cart {
    use serde::{Deserialize, Serialize};

    use super::fragments::{CartSummaryFields, UserErrorFields};
    use crate::shopify::types::CartLineInput;

    pub const OPERATION_NAME: &str = "AddToCart";
    pub const QUERY: &str = concat!(
        r"
mutation AddToCart(
  $cartId: ID!
  $lines: [CartLineInput!]!
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart { ...CartSummary }
    userErrors { code field message }
  }
}
",
        cart_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineInput>,
        pub country: Option<String>,
        pub language: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub cart: Option<CartSummaryFields>,
        pub user_errors: Vec<UserErrorFields>,
    }
}
