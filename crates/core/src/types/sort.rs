//! Listing sort parameters.
//!
//! The product listing accepts a `sort` query parameter with a small set of
//! shopper-facing values. Each maps to a backend sort key and a reverse flag.
//! Anything unrecognised falls back to relevance.

use serde::{Deserialize, Serialize};

/// Backend product sort keys used by the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortKey {
    #[default]
    Relevance,
    Price,
    BestSelling,
    Created,
    Manual,
}

impl SortKey {
    /// The GraphQL enum value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "RELEVANCE",
            Self::Price => "PRICE",
            Self::BestSelling => "BEST_SELLING",
            Self::Created => "CREATED",
            Self::Manual => "MANUAL",
        }
    }
}

/// Sort key plus direction sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub reverse: bool,
}

/// Shopper-facing sort options, as they appear in the `sort` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListingSort {
    #[default]
    Relevance,
    PriceHighLow,
    PriceLowHigh,
    BestSelling,
    Newest,
    Featured,
}

impl ListingSort {
    /// Every option, in the order the sort menu lists them.
    pub const ALL: [Self; 6] = [
        Self::Featured,
        Self::Relevance,
        Self::PriceLowHigh,
        Self::PriceHighLow,
        Self::BestSelling,
        Self::Newest,
    ];

    /// Parse the `sort` parameter. Unknown or absent values mean relevance.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("price-high-low") => Self::PriceHighLow,
            Some("price-low-high") => Self::PriceLowHigh,
            Some("best-selling") => Self::BestSelling,
            Some("newest") => Self::Newest,
            Some("featured") => Self::Featured,
            _ => Self::Relevance,
        }
    }

    /// The parameter value; relevance has none.
    #[must_use]
    pub const fn as_param(self) -> Option<&'static str> {
        match self {
            Self::Relevance => None,
            Self::PriceHighLow => Some("price-high-low"),
            Self::PriceLowHigh => Some("price-low-high"),
            Self::BestSelling => Some("best-selling"),
            Self::Newest => Some("newest"),
            Self::Featured => Some("featured"),
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::PriceHighLow => "Price: High - Low",
            Self::PriceLowHigh => "Price: Low - High",
            Self::BestSelling => "Best Selling",
            Self::Newest => "Newest",
            Self::Featured => "Featured",
        }
    }

    /// The backend sort key and direction.
    #[must_use]
    pub const fn spec(self) -> SortSpec {
        let (key, reverse) = match self {
            Self::Relevance => (SortKey::Relevance, false),
            Self::PriceHighLow => (SortKey::Price, true),
            Self::PriceLowHigh => (SortKey::Price, false),
            Self::BestSelling => (SortKey::BestSelling, false),
            Self::Newest => (SortKey::Created, true),
            Self::Featured => (SortKey::Manual, false),
        };
        SortSpec { key, reverse }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn spec(param: Option<&str>) -> SortSpec {
        ListingSort::from_param(param).spec()
    }

    #[test]
    fn test_mapping_table() {
        let cases = [
            ("price-high-low", SortKey::Price, true),
            ("price-low-high", SortKey::Price, false),
            ("best-selling", SortKey::BestSelling, false),
            ("newest", SortKey::Created, true),
            ("featured", SortKey::Manual, false),
        ];
        for (param, key, reverse) in cases {
            assert_eq!(spec(Some(param)), SortSpec { key, reverse }, "{param}");
        }
    }

    #[test]
    fn test_unknown_and_absent_fall_back_to_relevance() {
        let relevance = SortSpec {
            key: SortKey::Relevance,
            reverse: false,
        };
        assert_eq!(spec(Some("bogus")), relevance);
        assert_eq!(spec(None), relevance);
        assert_eq!(spec(Some("")), relevance);
    }

    #[test]
    fn test_param_round_trip_for_menu() {
        for sort in ListingSort::ALL {
            assert_eq!(ListingSort::from_param(sort.as_param()), sort);
        }
    }

    #[test]
    fn test_sort_key_wire_names() {
        assert_eq!(SortKey::BestSelling.as_str(), "BEST_SELLING");
        assert_eq!(
            serde_json::to_string(&SortKey::BestSelling).unwrap(),
            "\"BEST_SELLING\""
        );
    }
}
