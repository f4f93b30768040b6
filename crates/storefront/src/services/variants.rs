//! Variant selection for the product detail page.
//!
//! The selected variant is derived from the request's query parameters
//! (`?Format=Vinyl&Edition=Standard`). Option names and values match
//! case-insensitively and parameters that are not product options are
//! ignored. A request that does not pin down a variant is redirected to the
//! URL of the product's first variant.

use crate::error::{AppError, Result};
use crate::shopify::types::{Product, ProductVariant, SelectedOption};

use super::params::{self, eq_ignore_case};

/// Option name to chosen value, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedOptions(Vec<(String, String)>);

impl SelectedOptions {
    /// Build from query pairs, keeping the first occurrence of each name.
    pub fn from_query<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut selected: Vec<(String, String)> = Vec::new();
        for (name, value) in pairs {
            let name = name.into();
            if !selected.iter().any(|(n, _)| eq_ignore_case(n, &name)) {
                selected.push((name, value.into()));
            }
        }
        Self(selected)
    }

    /// Parse a raw query string (without the leading `?`).
    #[must_use]
    pub fn from_query_string(query: Option<&str>) -> Self {
        Self::from_query(params::parse(query))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value chosen for `name`, matched case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| eq_ignore_case(n, name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Outcome of variant resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The query names a variant; render it.
    Selected(&'a ProductVariant),
    /// Redirect (302) to this path + query.
    Redirect(String),
}

/// One value of an option as shown in the option picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValueChoice {
    pub value: String,
    /// The currently selected variant has this value.
    pub is_active: bool,
    /// A variant with this value (and the other current selections) can be bought.
    pub is_available: bool,
    /// Path + query that selects this value.
    pub link: String,
}

/// An option and its values as shown in the option picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionChoices {
    pub name: String,
    pub values: Vec<OptionValueChoice>,
}

fn variant_value<'v>(variant: &'v ProductVariant, option: &str) -> Option<&'v str> {
    variant
        .selected_options
        .iter()
        .find(|o| eq_ignore_case(&o.name, option))
        .map(|o| o.value.as_str())
}

/// Find the variant whose selections equal `selected` on every product option.
///
/// Returns `None` when an option is left unselected or no variant has the
/// chosen combination.
#[must_use]
pub fn find_variant<'a>(product: &'a Product, selected: &SelectedOptions) -> Option<&'a ProductVariant> {
    let wanted = product
        .options
        .iter()
        .map(|option| selected.get(&option.name).map(|value| (option.name.as_str(), value)))
        .collect::<Option<Vec<_>>>()?;

    product.variants.iter().find(|variant| {
        wanted
            .iter()
            .all(|(name, value)| variant_value(variant, name).is_some_and(|v| eq_ignore_case(v, value)))
    })
}

/// Resolve the variant to render for `path?query`.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product has no variants.
pub fn resolve<'a>(
    product: &'a Product,
    selected: &SelectedOptions,
    path: &str,
    query: Option<&str>,
) -> Result<Resolution<'a>> {
    let first = product
        .variants
        .first()
        .ok_or_else(|| AppError::NotFound(format!("Product has no variants: {}", product.handle)))?;

    if let Some(variant) = find_variant(product, selected) {
        return Ok(Resolution::Selected(variant));
    }

    tracing::debug!(
        handle = %product.handle,
        variant = %first.id,
        "No variant selected, redirecting to first variant"
    );
    Ok(Resolution::Redirect(first_variant_location(path, query, first)))
}

/// The selection to look up server-side when `product.variants` is only a
/// prefix of the product's variants.
///
/// `None` unless the list was cut short and `selected` names a value for
/// every option; any other request is settled by [`resolve`] alone.
#[must_use]
pub fn unlisted_selection(product: &Product, selected: &SelectedOptions) -> Option<Vec<SelectedOption>> {
    if !product.has_more_variants {
        return None;
    }

    product
        .options
        .iter()
        .map(|option| {
            selected.get(&option.name).map(|value| SelectedOption {
                name: option.name.clone(),
                value: value.to_string(),
            })
        })
        .collect::<Option<Vec<_>>>()
        .filter(|selection| !selection.is_empty())
}

/// `path?query` with every selection of `variant` set in the query.
///
/// Unrelated parameters keep their position; a selection already present
/// (under any letter case) is overwritten in place.
#[must_use]
pub fn first_variant_location(path: &str, query: Option<&str>, variant: &ProductVariant) -> String {
    let mut pairs = params::parse(query);

    for option in &variant.selected_options {
        params::set(&mut pairs, &option.name, &option.value);
    }

    params::location(path, &pairs)
}

/// Options with more than one value, each value linked to the URL selecting it.
///
/// Links keep the selected variant's other choices and any unrelated query
/// parameters.
#[must_use]
pub fn option_choices(
    product: &Product,
    selected_variant: &ProductVariant,
    path: &str,
    query: Option<&str>,
) -> Vec<OptionChoices> {
    let pairs = params::parse(query);

    product
        .options
        .iter()
        .filter(|option| option.values.len() > 1)
        .map(|option| {
            let values = option
                .values
                .iter()
                .map(|value| {
                    let mut selection = pairs.clone();
                    for current in &selected_variant.selected_options {
                        params::set(&mut selection, &current.name, &current.value);
                    }
                    params::set(&mut selection, &option.name, value);

                    let candidate = SelectedOptions::from_query(selection.iter().cloned());
                    let is_available = find_variant(product, &candidate)
                        .is_some_and(|variant| variant.available_for_sale);

                    OptionValueChoice {
                        value: value.clone(),
                        is_active: variant_value(selected_variant, &option.name)
                            .is_some_and(|v| eq_ignore_case(v, value)),
                        is_available,
                        link: params::location(path, &selection),
                    }
                })
                .collect();

            OptionChoices {
                name: option.name.clone(),
                values,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::shopify::types::{Money, ProductOption, SelectedOption, Seo};
    use waxworks_core::{ProductId, VariantId};

    pub(crate) fn variant(id: u32, options: &[(&str, &str)], available: bool) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(format!("gid://shopify/ProductVariant/{id}")),
            title: options
                .iter()
                .map(|(_, v)| *v)
                .collect::<Vec<_>>()
                .join(" / "),
            available_for_sale: available,
            sku: None,
            price: Money {
                amount: "24.99".to_string(),
                currency_code: "USD".to_string(),
            },
            compare_at_price: None,
            unit_price: None,
            selected_options: options
                .iter()
                .map(|(name, value)| SelectedOption {
                    name: (*name).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
            image: None,
        }
    }

    /// Format x Edition, with the Cassette / Deluxe combination missing and
    /// CD / Standard sold out.
    pub(crate) fn record() -> Product {
        Product {
            id: ProductId::new("gid://shopify/Product/1"),
            handle: "midnight-static".to_string(),
            title: "Midnight Static".to_string(),
            vendor: "Waxworks".to_string(),
            artist_name: Some("The Static Lines".to_string()),
            description: String::new(),
            description_html: String::new(),
            seo: Seo::default(),
            options: vec![
                ProductOption {
                    name: "Format".to_string(),
                    values: vec!["Vinyl".to_string(), "CD".to_string(), "Cassette".to_string()],
                },
                ProductOption {
                    name: "Edition".to_string(),
                    values: vec!["Standard".to_string(), "Deluxe".to_string()],
                },
            ],
            variants: vec![
                variant(10, &[("Format", "Vinyl"), ("Edition", "Standard")], true),
                variant(11, &[("Format", "Vinyl"), ("Edition", "Deluxe")], true),
                variant(12, &[("Format", "CD"), ("Edition", "Standard")], false),
                variant(13, &[("Format", "CD"), ("Edition", "Deluxe")], true),
                variant(14, &[("Format", "Cassette"), ("Edition", "Standard")], true),
            ],
            has_more_variants: false,
            media: vec![],
        }
    }

    fn selected(pairs: &[(&str, &str)]) -> SelectedOptions {
        SelectedOptions::from_query(pairs.iter().copied())
    }

    #[test]
    fn test_from_query_keeps_first_occurrence() {
        let s = selected(&[("Format", "CD"), ("format", "Vinyl"), ("Edition", "Deluxe")]);
        assert_eq!(s.get("FORMAT"), Some("CD"));
        assert_eq!(s.iter().count(), 2);
    }

    #[test]
    fn test_find_variant_exact_selection() {
        let product = record();
        let v = find_variant(&product, &selected(&[("Format", "CD"), ("Edition", "Deluxe")]));
        assert_eq!(v.map(|v| v.id.as_str()), Some("gid://shopify/ProductVariant/13"));
    }

    #[test]
    fn test_find_variant_returns_unavailable_match() {
        let product = record();
        let v = find_variant(&product, &selected(&[("Format", "CD"), ("Edition", "Standard")]));
        assert!(v.is_some_and(|v| !v.available_for_sale));
    }

    #[test]
    fn test_find_variant_ignores_unknown_and_case() {
        let product = record();
        let v = find_variant(
            &product,
            &selected(&[("utm_source", "mail"), ("format", "vinyl"), ("EDITION", "deluxe")]),
        );
        assert_eq!(v.map(|v| v.id.as_str()), Some("gid://shopify/ProductVariant/11"));
    }

    #[test]
    fn test_find_variant_partial_or_missing_combination() {
        let product = record();
        assert!(find_variant(&product, &selected(&[("Format", "Vinyl")])).is_none());
        assert!(find_variant(&product, &selected(&[("Format", "Cassette"), ("Edition", "Deluxe")])).is_none());
        assert!(find_variant(&product, &selected(&[("Format", "Shellac"), ("Edition", "Standard")])).is_none());
    }

    #[test]
    fn test_every_full_selection_has_at_most_one_match() {
        let product = record();
        for format in &product.options[0].values {
            for edition in &product.options[1].values {
                let s = selected(&[("Format", format.as_str()), ("Edition", edition.as_str())]);
                let matches = product
                    .variants
                    .iter()
                    .filter(|v| {
                        variant_value(v, "Format") == Some(format.as_str())
                            && variant_value(v, "Edition") == Some(edition.as_str())
                    })
                    .count();
                assert!(matches <= 1);
                assert_eq!(find_variant(&product, &s).is_some(), matches == 1);
            }
        }
    }

    #[test]
    fn test_resolve_empty_selection_redirects_to_first_variant() {
        let product = record();
        let resolution = resolve(&product, &SelectedOptions::default(), "/products/midnight-static", None);
        assert_eq!(
            resolution.ok(),
            Some(Resolution::Redirect(
                "/products/midnight-static?Format=Vinyl&Edition=Standard".to_string()
            ))
        );
    }

    #[test]
    fn test_resolve_no_match_preserves_other_params() {
        let product = record();
        let query = "ref=home&format=Shellac&Edition=Deluxe";
        let s = SelectedOptions::from_query_string(Some(query));
        let resolution = resolve(&product, &s, "/products/midnight-static", Some(query));
        assert_eq!(
            resolution.ok(),
            Some(Resolution::Redirect(
                "/products/midnight-static?ref=home&Format=Vinyl&Edition=Standard".to_string()
            ))
        );
    }

    #[test]
    fn test_resolve_selected() {
        let product = record();
        let query = "Format=Cassette&Edition=Standard";
        let s = SelectedOptions::from_query_string(Some(query));
        let resolution = resolve(&product, &s, "/products/midnight-static", Some(query));
        assert!(matches!(
            resolution,
            Ok(Resolution::Selected(v)) if v.id.as_str() == "gid://shopify/ProductVariant/14"
        ));
    }

    #[test]
    fn test_resolve_without_variants_is_not_found() {
        let mut product = record();
        product.variants.clear();
        let resolution = resolve(&product, &SelectedOptions::default(), "/products/x", None);
        assert!(matches!(resolution, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_redirect_target_resolves() {
        let product = record();
        let Ok(Resolution::Redirect(location)) =
            resolve(&product, &SelectedOptions::default(), "/products/midnight-static", Some("Format=Reel"))
        else {
            panic!("expected redirect");
        };
        let query = location.split_once('?').map(|(_, q)| q);
        let s = SelectedOptions::from_query_string(query);
        assert!(matches!(
            resolve(&product, &s, "/products/midnight-static", query),
            Ok(Resolution::Selected(_))
        ));
    }

    #[test]
    fn test_resolve_product_without_options_selects_first() {
        let mut product = record();
        product.options = vec![];
        product.variants = vec![variant(20, &[], true), variant(21, &[], true)];

        for query in [None, Some("ref=home"), Some("Format=Vinyl")] {
            let s = SelectedOptions::from_query_string(query);
            match resolve(&product, &s, "/products/midnight-static", query) {
                Ok(Resolution::Selected(v)) => assert_eq!(v.id.as_str(), "gid://shopify/ProductVariant/20"),
                other => panic!("expected first variant for {query:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unlisted_selection_only_for_cut_short_lists() {
        let selected = SelectedOptions::from_query_string(Some("format=Reel&edition=Deluxe&ref=home"));

        let mut product = record();
        assert_eq!(unlisted_selection(&product, &selected), None);

        product.has_more_variants = true;
        let selection = unlisted_selection(&product, &selected).unwrap();
        assert_eq!(
            selection,
            vec![
                SelectedOption { name: "Format".to_string(), value: "Reel".to_string() },
                SelectedOption { name: "Edition".to_string(), value: "Deluxe".to_string() },
            ]
        );

        // A partial selection still redirects to the first variant
        let partial = SelectedOptions::from_query_string(Some("Format=Reel"));
        assert_eq!(unlisted_selection(&product, &partial), None);
    }

    #[test]
    fn test_option_choices() {
        let mut product = record();
        product.options.push(ProductOption {
            name: "Speed".to_string(),
            values: vec!["33".to_string()],
        });
        for variant in &mut product.variants {
            variant.selected_options.push(SelectedOption {
                name: "Speed".to_string(),
                value: "33".to_string(),
            });
        }
        let current = &product.variants[2]; // CD / Standard
        let choices = option_choices(&product, current, "/products/midnight-static", Some("ref=home"));

        // single-value options are hidden
        assert_eq!(choices.len(), 2);

        let formats = &choices[0];
        assert_eq!(formats.name, "Format");
        let cd = &formats.values[1];
        assert!(cd.is_active);
        assert!(!cd.is_available);
        assert_eq!(
            formats.values[0].link,
            "/products/midnight-static?ref=home&Format=Vinyl&Edition=Standard&Speed=33"
        );

        let editions = &choices[1];
        assert!(editions.values[1].is_available);
        assert!(!editions.values[1].is_active);
    }

    #[test]
    fn test_option_choices_missing_combination_unavailable() {
        let product = record();
        let current = &product.variants[4]; // Cassette / Standard
        let choices = option_choices(&product, current, "/products/midnight-static", None);
        let deluxe = &choices[1].values[1];
        assert_eq!(deluxe.value, "Deluxe");
        assert!(!deluxe.is_available);
    }
}
