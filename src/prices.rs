//! Prices

use std::{fmt, ops::Deref};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::currency;

/// Errors converting between [`Price`] and [`Money`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount does not fit in the signed minor-unit range used by [`Money`].
    #[error("price {0} exceeds the supported range")]
    Overflow(u64),

    /// A negative amount cannot be represented as a price.
    #[error("price cannot be negative (got {0} minor units)")]
    Negative(i64),
}

/// Represents a price in centavos.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price {
    value: u64,
}

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self { value: 0 };

    /// Creates a new price from minor units.
    pub const fn new(value: u64) -> Self {
        Price { value }
    }

    /// Returns the price in minor units.
    pub const fn minor_units(self) -> u64 {
        self.value
    }

    /// Subtract, flooring at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self::new(self.value.saturating_sub(other.value))
    }

    /// Returns true if the price is zero.
    pub const fn is_zero(self) -> bool {
        self.value == 0
    }

    /// Converts the price into [`Money`] in the shop currency.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] when the value does not fit in `i64`.
    pub fn to_money(self) -> Result<Money<'static, Currency>, PriceError> {
        let minor = i64::try_from(self.value).map_err(|_overflow| PriceError::Overflow(self.value))?;

        Ok(Money::from_minor(minor, currency()))
    }

    /// Converts [`Money`] back into a price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] when the amount is below zero.
    pub fn from_money(money: &Money<'_, Currency>) -> Result<Self, PriceError> {
        let minor = money.to_minor_units();

        u64::try_from(minor)
            .map(Self::new)
            .map_err(|_negative| PriceError::Negative(minor))
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {}.{:02}", self.value / 100, self.value % 100)
    }
}
