//! Type-safe price representation using decimal arithmetic.
//!
//! The Storefront API returns money as a decimal string plus an ISO 4217
//! code. Comparisons (e.g. "is this variant on sale") must happen on the
//! parsed decimal, never on the string.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The currency code is not three ASCII letters.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse a price from the API's string amount and currency code.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the amount is not a decimal or the currency
    /// code is not three letters.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_string()))?;
        let currency_code = currency_code.parse()?;
        Ok(Self::new(amount, currency_code))
    }

    /// Format for display, dropping a zero fractional part ("$10", "$10.50").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.amount.round_dp(2);
        let amount = if rounded.fract().is_zero() {
            rounded.trunc().normalize().to_string()
        } else {
            format!("{rounded:.2}")
        };
        match self.currency_code.symbol() {
            Some(symbol) => format!("{symbol}{amount}"),
            None => format!("{} {amount}", self.currency_code.code()),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Whether a variant is on sale: both prices present and price < compare-at.
#[must_use]
pub fn is_on_sale(price: Option<&Price>, compare_at_price: Option<&Price>) -> bool {
    match (price, compare_at_price) {
        (Some(price), Some(compare_at)) => price.amount < compare_at.amount,
        _ => false,
    }
}

/// ISO 4217 currency codes.
///
/// The codes with a known symbol are named; any other well-formed code is
/// kept as [`CurrencyCode::Other`] and displayed by its letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    JPY,
    KRW,
    /// Three uppercase ASCII letters, e.g. `CHF`.
    Other([u8; 3]),
}

impl CurrencyCode {
    /// Display symbol, when the currency has one we render.
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        match self {
            Self::USD | Self::CAD | Self::AUD => Some("$"),
            Self::EUR => Some("€"),
            Self::GBP => Some("£"),
            Self::JPY => Some("¥"),
            Self::KRW => Some("₩"),
            Self::Other(_) => None,
        }
    }

    /// The three-letter code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::JPY => "JPY",
            Self::KRW => "KRW",
            // Only ever built from ASCII letters
            Self::Other(letters) => core::str::from_utf8(letters).unwrap_or("XXX"),
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        match code.as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            "JPY" => Ok(Self::JPY),
            "KRW" => Ok(Self::KRW),
            _ => match code.as_bytes() {
                &[a, b, c] if [a, b, c].iter().all(u8::is_ascii_uppercase) => {
                    Ok(Self::Other([a, b, c]))
                }
                _ => Err(PriceError::UnsupportedCurrency(s.to_string())),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(amount: &str) -> Price {
        Price::parse(amount, "USD").unwrap()
    }

    #[test]
    fn test_on_sale_when_price_below_compare_at() {
        assert!(is_on_sale(Some(&usd("10.00")), Some(&usd("15.00"))));
    }

    #[test]
    fn test_not_on_sale_when_prices_equal() {
        assert!(!is_on_sale(Some(&usd("10.00")), Some(&usd("10.00"))));
    }

    #[test]
    fn test_not_on_sale_without_compare_at() {
        assert!(!is_on_sale(Some(&usd("10.00")), None));
        assert!(!is_on_sale(None, Some(&usd("10.00"))));
    }

    #[test]
    fn test_on_sale_compares_decimals_not_strings() {
        // "9.5" > "10.0" lexically, but not numerically
        assert!(is_on_sale(Some(&usd("9.5")), Some(&usd("10.0"))));
    }

    #[test]
    fn test_parse_rejects_bad_amount() {
        assert_eq!(
            Price::parse("ten", "USD"),
            Err(PriceError::InvalidAmount("ten".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_malformed_currency() {
        assert!(matches!(
            Price::parse("1.00", "DOLLARS"),
            Err(PriceError::UnsupportedCurrency(_))
        ));
        assert!(matches!(
            Price::parse("1.00", "C1F"),
            Err(PriceError::UnsupportedCurrency(_))
        ));
    }

    #[test]
    fn test_any_iso_code_is_accepted() {
        let price = Price::parse("10.00", "chf").unwrap();
        let compare_at = Price::parse("15.00", "CHF").unwrap();
        assert_eq!(price.currency_code, CurrencyCode::Other(*b"CHF"));
        assert_eq!(price.currency_code.code(), "CHF");
        assert!(is_on_sale(Some(&price), Some(&compare_at)));
        assert_eq!(price.display(), "CHF 10");
        assert_eq!(Price::parse("129.5", "SEK").unwrap().to_string(), "SEK 129.50");
    }

    #[test]
    fn test_display_drops_zero_fraction() {
        assert_eq!(usd("10.00").display(), "$10");
        assert_eq!(usd("10.5").display(), "$10.50");
        assert_eq!(Price::parse("24.99", "gbp").unwrap().to_string(), "£24.99");
    }
}
