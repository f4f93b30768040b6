//! Product listing: sorting, cursor pagination, and the title filter.
//!
//! Query parameters:
//!
//! - `search` - free text, passed to the API's `query` argument
//! - `sort` - see [`ListingSort`]
//! - `cursor` + `direction` - cursor of the page edge and which way to go
//! - `filter` - title substring applied to the fetched page only
//!
//! The title filter never fetches more pages and leaves the pagination flags
//! untouched, so a filtered page can be short (or empty) while matches exist
//! on neighbouring pages.

use waxworks_core::ListingSort;

use crate::error::Result;
use crate::shopify::StorefrontClient;
use crate::shopify::types::{PageInfo, PaginationVariables, ProductPageRequest, ProductSummary};

use super::params;

/// Which way a cursor points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

impl Direction {
    /// Parse the `direction` parameter; anything but `previous` means next.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("previous") => Self::Previous,
            _ => Self::Next,
        }
    }

    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}

/// Listing parameters read from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingParams {
    pub search: Option<String>,
    pub sort: ListingSort,
    pub cursor: Option<String>,
    pub direction: Direction,
    pub filter: Option<String>,
}

impl ListingParams {
    /// Read from a raw query string. Empty values count as absent.
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        let pairs = params::parse(query);
        let get = |name: &str| {
            pairs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            search: get("search"),
            sort: ListingSort::from_param(get("sort").as_deref()),
            cursor: get("cursor"),
            direction: Direction::from_param(get("direction").as_deref()),
            filter: get("filter"),
        }
    }

    /// The API request for this page.
    #[must_use]
    pub fn page_request(&self, page_size: u16) -> ProductPageRequest {
        ProductPageRequest {
            pagination: pagination_variables(self.cursor.as_deref(), self.direction, page_size),
            sort: self.sort.spec(),
            query: self.search.clone(),
        }
    }
}

/// Connection window for a cursor and direction.
///
/// Going back asks for the `last` items `before` the cursor; anything else
/// asks for the `first` items `after` it.
#[must_use]
pub fn pagination_variables(
    cursor: Option<&str>,
    direction: Direction,
    page_size: u16,
) -> PaginationVariables {
    let size = Some(i64::from(page_size));
    let cursor = cursor.map(str::to_string);
    match direction {
        Direction::Previous => PaginationVariables {
            last: size,
            start_cursor: cursor,
            ..PaginationVariables::default()
        },
        Direction::Next => PaginationVariables {
            first: size,
            end_cursor: cursor,
            ..PaginationVariables::default()
        },
    }
}

/// Products whose title contains `filter`, ignoring case. Order is kept.
#[must_use]
pub fn filter_by_title(products: Vec<ProductSummary>, filter: Option<&str>) -> Vec<ProductSummary> {
    let Some(needle) = filter.map(str::to_lowercase).filter(|f| !f.is_empty()) else {
        return products;
    };
    products
        .into_iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .collect()
}

/// Link to the adjacent page, keeping every other parameter.
fn page_link(
    path: &str,
    query: Option<&str>,
    cursor: Option<&str>,
    direction: Direction,
) -> Option<String> {
    let cursor = cursor?;
    let mut pairs = params::parse(query);
    params::set(&mut pairs, "cursor", cursor);
    params::set(&mut pairs, "direction", direction.as_param());
    Some(params::location(path, &pairs))
}

/// Links to the next and previous pages, when they exist.
#[must_use]
pub fn nav_links(path: &str, query: Option<&str>, page_info: &PageInfo) -> (Option<String>, Option<String>) {
    let next = page_info
        .has_next_page
        .then(|| page_link(path, query, page_info.end_cursor.as_deref(), Direction::Next))
        .flatten();
    let previous = page_info
        .has_previous_page
        .then(|| page_link(path, query, page_info.start_cursor.as_deref(), Direction::Previous))
        .flatten();
    (next, previous)
}

/// A listing page ready to render.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub products: Vec<ProductSummary>,
    /// Pagination state as returned by the API (not affected by `filter`).
    pub page_info: PageInfo,
    pub next_link: Option<String>,
    pub previous_link: Option<String>,
}

/// Fetch and filter one listing page.
///
/// # Errors
///
/// Returns an error if the products cannot be fetched.
pub async fn load_listing(
    client: &StorefrontClient,
    listing: &ListingParams,
    page_size: u16,
    path: &str,
    query: Option<&str>,
) -> Result<ListingPage> {
    let connection = client.get_products(listing.page_request(page_size)).await?;

    let (next_link, previous_link) = nav_links(path, query, &connection.page_info);
    let fetched = connection.products.len();
    let products = filter_by_title(connection.products, listing.filter.as_deref());
    tracing::debug!(fetched, shown = products.len(), "Loaded listing page");

    Ok(ListingPage {
        products,
        page_info: connection.page_info,
        next_link,
        previous_link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use waxworks_core::{ProductId, SortKey, SortSpec};

    fn summary(title: &str) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(format!("gid://shopify/Product/{}", title.len())),
            handle: title.to_lowercase().replace(' ', "-"),
            title: title.to_string(),
            vendor: "Waxworks".to_string(),
            published_at: None,
            first_variant: None,
        }
    }

    #[test]
    fn test_from_query() {
        let params = ListingParams::from_query(Some(
            "search=blue&sort=price-high-low&cursor=abc%3D&direction=previous&filter=Red",
        ));
        assert_eq!(params.search.as_deref(), Some("blue"));
        assert_eq!(params.sort, ListingSort::PriceHighLow);
        assert_eq!(params.cursor.as_deref(), Some("abc="));
        assert_eq!(params.direction, Direction::Previous);
        assert_eq!(params.filter.as_deref(), Some("Red"));
    }

    #[test]
    fn test_from_query_defaults() {
        let params = ListingParams::from_query(Some("sort=bogus&cursor=&search=+"));
        assert_eq!(params, ListingParams::default());
        assert_eq!(params.sort.spec(), SortSpec::default());
    }

    #[test]
    fn test_page_request_uses_sort_and_search() {
        let params = ListingParams::from_query(Some("sort=price-high-low&search=jazz"));
        let request = params.page_request(8);
        assert_eq!(
            request.sort,
            SortSpec {
                key: SortKey::Price,
                reverse: true
            }
        );
        assert_eq!(request.query.as_deref(), Some("jazz"));
        assert_eq!(request.pagination.first, Some(8));
    }

    #[test]
    fn test_pagination_variables_forward() {
        let vars = pagination_variables(Some("c1"), Direction::Next, 8);
        assert_eq!(
            vars,
            PaginationVariables {
                first: Some(8),
                last: None,
                start_cursor: None,
                end_cursor: Some("c1".to_string()),
            }
        );
    }

    #[test]
    fn test_pagination_variables_backward() {
        let vars = pagination_variables(Some("c0"), Direction::Previous, 8);
        assert_eq!(vars.last, Some(8));
        assert_eq!(vars.start_cursor.as_deref(), Some("c0"));
        assert!(vars.first.is_none() && vars.end_cursor.is_none());
    }

    #[test]
    fn test_filter_by_title() {
        let products = vec![summary("Red Album"), summary("Blue EP"), summary("Redline")];
        let titles: Vec<_> = filter_by_title(products, Some("red"))
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Red Album", "Redline"]);
    }

    #[test]
    fn test_filter_absent_keeps_page() {
        let products = vec![summary("Red Album"), summary("Blue EP")];
        assert_eq!(filter_by_title(products, None).len(), 2);
    }

    #[test]
    fn test_nav_links_preserve_other_params() {
        let page_info = PageInfo {
            has_next_page: true,
            has_previous_page: true,
            start_cursor: Some("s0".to_string()),
            end_cursor: Some("e1".to_string()),
        };
        let (next, previous) = nav_links(
            "/products",
            Some("sort=newest&cursor=old&direction=previous&filter=red"),
            &page_info,
        );
        assert_eq!(
            next.as_deref(),
            Some("/products?sort=newest&cursor=e1&direction=next&filter=red")
        );
        assert_eq!(
            previous.as_deref(),
            Some("/products?sort=newest&cursor=s0&direction=previous&filter=red")
        );
    }

    #[test]
    fn test_nav_links_need_flag_and_cursor() {
        let page_info = PageInfo {
            has_next_page: true,
            has_previous_page: false,
            start_cursor: Some("s0".to_string()),
            end_cursor: None,
        };
        assert_eq!(nav_links("/products", None, &page_info), (None, None));
    }
}
