//! Product type conversion functions.

use std::collections::HashSet;

use waxworks_core::{ProductId, VariantId};

use crate::shopify::types::{
    Image, MediaContent, MediaItem, Money, PageInfo, Product, ProductConnection, ProductDetail,
    ProductOption, ProductSummary, ProductVariant, SelectedOption, Seo, Shop, ShopPolicy,
    VideoSource,
};

use super::super::queries::fragments::{
    ImageFields, MoneyFields, PageInfoFields, ProductCardFields, ProductVariantFields,
};
use super::super::queries::{get_product_by_handle, get_products};

fn convert_money(money: MoneyFields) -> Money {
    Money {
        amount: money.amount,
        currency_code: money.currency_code,
    }
}

fn convert_image(image: ImageFields) -> Image {
    Image {
        id: image.id,
        url: image.url,
        alt_text: image.alt_text,
        width: image.width,
        height: image.height,
    }
}

fn preview_image(preview: Option<get_product_by_handle::UrlFields>, alt: Option<&String>) -> Option<Image> {
    preview.map(|p| Image {
        id: None,
        url: p.url,
        alt_text: alt.cloned(),
        width: None,
        height: None,
    })
}

pub fn convert_variant(variant: ProductVariantFields) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(variant.id),
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        sku: variant.sku,
        price: convert_money(variant.price),
        compare_at_price: variant.compare_at_price.map(convert_money),
        unit_price: variant.unit_price.map(convert_money),
        selected_options: variant
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name,
                value: o.value,
            })
            .collect(),
        image: variant.image.map(convert_image),
    }
}

fn convert_media(media: get_product_by_handle::MediaFields) -> Option<MediaItem> {
    use get_product_by_handle::MediaFields;

    let item = match media {
        MediaFields::MediaImage {
            id,
            alt,
            preview_image: preview,
            image,
        } => MediaItem {
            preview_image: preview_image(preview, alt.as_ref()),
            // An image still processing has no `image` yet
            content: MediaContent::Image(image.map(convert_image)?),
            id,
            alt,
        },
        MediaFields::Video {
            id,
            alt,
            preview_image: preview,
            sources,
        } => MediaItem {
            preview_image: preview_image(preview, alt.as_ref()),
            content: MediaContent::Video(
                sources
                    .into_iter()
                    .map(|s| VideoSource {
                        url: s.url,
                        mime_type: s.mime_type,
                    })
                    .collect(),
            ),
            id,
            alt,
        },
        MediaFields::ExternalVideo {
            id,
            alt,
            preview_image: preview,
            embed_url,
        } => MediaItem {
            preview_image: preview_image(preview, alt.as_ref()),
            content: MediaContent::ExternalVideo { embed_url },
            id,
            alt,
        },
        MediaFields::Model3d {
            id,
            alt,
            preview_image: preview,
        } => MediaItem {
            preview_image: preview_image(preview, alt.as_ref()),
            content: MediaContent::Model3d,
            id,
            alt,
        },
    };
    Some(item)
}

fn convert_policy(policy: get_product_by_handle::PolicyFields) -> ShopPolicy {
    ShopPolicy {
        handle: policy.handle,
        body: policy.body,
    }
}

/// Convert the product page response. `None` when the handle matched nothing.
pub fn convert_product_detail(data: get_product_by_handle::ResponseData) -> Option<ProductDetail> {
    let product = data.product?;

    let product = Product {
        id: ProductId::new(product.id),
        handle: product.handle,
        title: product.title,
        vendor: product.vendor,
        artist_name: product.artist_name.map(|m| m.value),
        description: product.description,
        description_html: product.description_html,
        seo: Seo {
            title: product.seo.title,
            description: product.seo.description,
        },
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                name: o.name,
                values: o.option_values.into_iter().map(|v| v.name).collect(),
            })
            .collect(),
        variants: product
            .variants
            .nodes
            .into_iter()
            .map(convert_variant)
            .collect(),
        has_more_variants: product.variants.page_info.has_next_page,
        media: product
            .media
            .nodes
            .into_iter()
            .filter_map(convert_media)
            .collect(),
    };

    let shop = Shop {
        name: data.shop.name,
        primary_domain_url: data.shop.primary_domain.url,
        shipping_policy: data.shop.shipping_policy.map(convert_policy),
        refund_policy: data.shop.refund_policy.map(convert_policy),
    };

    Some(ProductDetail { product, shop })
}

pub fn convert_product_card(card: ProductCardFields) -> ProductSummary {
    ProductSummary {
        id: ProductId::new(card.id),
        handle: card.handle,
        title: card.title,
        vendor: card.vendor,
        published_at: card.published_at,
        first_variant: card.variants.nodes.into_iter().next().map(convert_variant),
    }
}

fn convert_page_info(page_info: PageInfoFields) -> PageInfo {
    PageInfo {
        has_next_page: page_info.has_next_page,
        has_previous_page: page_info.has_previous_page,
        start_cursor: page_info.start_cursor,
        end_cursor: page_info.end_cursor,
    }
}

pub fn convert_product_connection(connection: get_products::ProductsConnection) -> ProductConnection {
    ProductConnection {
        products: connection
            .nodes
            .into_iter()
            .map(convert_product_card)
            .collect(),
        page_info: convert_page_info(connection.page_info),
    }
}

/// Recommended products followed by best sellers, each product once (first
/// occurrence wins), never including the product being viewed.
pub fn merge_recommendations(
    recommended: Vec<ProductCardFields>,
    additional: Vec<ProductCardFields>,
    viewed_handle: &str,
) -> Vec<ProductSummary> {
    let mut seen = HashSet::new();
    recommended
        .into_iter()
        .chain(additional)
        .filter(|card| card.handle != viewed_handle)
        .filter(|card| seen.insert(card.id.clone()))
        .map(convert_product_card)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::storefront::queries::fragments::Nodes;

    fn card(id: u32, title: &str) -> ProductCardFields {
        ProductCardFields {
            id: format!("gid://shopify/Product/{id}"),
            title: title.to_string(),
            published_at: None,
            handle: title.to_lowercase().replace(' ', "-"),
            vendor: "Waxworks".to_string(),
            variants: Nodes { nodes: vec![] },
        }
    }

    #[test]
    fn test_merge_recommendations_dedupes_and_excludes_viewed() {
        let merged = merge_recommendations(
            vec![card(2, "Blue EP"), card(1, "Red Album")],
            vec![card(3, "Redline"), card(2, "Blue EP"), card(4, "Gold LP")],
            "red-album",
        );
        let titles: Vec<_> = merged.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Blue EP", "Redline", "Gold LP"]);
    }

    #[test]
    fn test_merge_recommendations_without_viewed_keeps_everything() {
        let merged = merge_recommendations(vec![card(2, "Blue EP")], vec![card(3, "Redline")], "gold-lp");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_convert_product_detail_missing_product() {
        let data: get_product_by_handle::ResponseData = serde_json::from_value(serde_json::json!({
            "product": null,
            "shop": {
                "name": "Waxworks Records",
                "primaryDomain": { "url": "https://waxworks.example" },
                "shippingPolicy": null,
                "refundPolicy": null
            }
        }))
        .expect("response");
        assert!(convert_product_detail(data).is_none());
    }
}
