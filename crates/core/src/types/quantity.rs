//! Purchase quantity counter.
//!
//! The product page lets a shopper pick how many units to add to the cart.
//! The counter starts at 1 and can never drop below it.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A purchase quantity, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest quantity that can be purchased.
    pub const MIN: Self = Self(1);

    /// Create a quantity, clamping zero up to [`Quantity::MIN`].
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value == 0 { Self::MIN } else { Self(value) }
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// One more unit.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer unit, never below [`Quantity::MIN`].
    #[must_use]
    pub const fn decrement(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }

    /// Apply a counter step.
    #[must_use]
    pub const fn step(self, step: QuantityStep) -> Self {
        match step {
            QuantityStep::Increment => self.increment(),
            QuantityStep::Decrement => self.decrement(),
        }
    }

    /// Whether the decrement control should be disabled.
    #[must_use]
    pub const fn is_min(self) -> bool {
        self.0 == Self::MIN.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> Self {
        Self::from(quantity.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user action on the quantity counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityStep {
    Increment,
    Decrement,
}
