//! Coupons

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prices::Price;

pub mod validation;

pub use validation::{ConfirmedDiscount, CouponError, CouponQuote, PendingDiscount, validate};

/// Errors in a coupon definition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponDefinitionError {
    /// The code is empty once whitespace is removed.
    #[error("coupon code cannot be empty")]
    EmptyCode,

    /// Unknown coupon kind.
    #[error("unknown coupon type: {0:?}")]
    UnknownKind(String),

    /// The discount value is zero or negative.
    #[error("coupon value must be greater than zero")]
    NonPositiveValue,

    /// A percentage above 100.
    #[error("percentage {0} exceeds 100")]
    PercentageAboveHundred(Decimal),

    /// A percentage with more than two decimal places.
    #[error("percentage {0} has more than two decimal places")]
    PercentagePrecision(Decimal),

    /// A usage cap of zero.
    #[error("usage cap must be greater than zero")]
    ZeroUsageCap,

    /// Usage count already above the cap.
    #[error("usage count {count} exceeds cap {cap}")]
    UsageAboveCap {
        /// Current usage count
        count: u32,

        /// Configured cap
        cap: u32,
    },
}

/// Case-normalized coupon code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalizes `code` (trimmed, upper-cased).
    ///
    /// # Errors
    ///
    /// Returns [`CouponDefinitionError::EmptyCode`] if nothing is left after trimming.
    pub fn parse(code: &str) -> Result<Self, CouponDefinitionError> {
        let normalized = code.trim().to_uppercase();

        if normalized.is_empty() {
            return Err(CouponDefinitionError::EmptyCode);
        }

        Ok(Self(normalized))
    }

    /// Normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponDefinitionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

/// Coupon kind as stored and exchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CouponKind {
    /// Percentage of the subtotal.
    #[serde(rename = "percentual")]
    Percentage,

    /// Fixed amount off the subtotal.
    #[serde(rename = "valor_fixo")]
    Fixed,
}

impl CouponKind {
    /// Wire label.
    pub const fn label(self) -> &'static str {
        match self {
            CouponKind::Percentage => "percentual",
            CouponKind::Fixed => "valor_fixo",
        }
    }
}

impl fmt::Display for CouponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CouponKind {
    type Err = CouponDefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentual" => Ok(CouponKind::Percentage),
            "valor_fixo" => Ok(CouponKind::Fixed),
            _ => Err(CouponDefinitionError::UnknownKind(s.to_string())),
        }
    }
}

/// Discount a coupon grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CouponValue {
    /// Percentage in `0..=100`.
    #[serde(rename = "percentual")]
    Percentage(Decimal),

    /// Fixed amount in centavos.
    #[serde(rename = "valor_fixo")]
    Fixed(Price),
}

impl CouponValue {
    /// Kind of discount.
    pub const fn kind(&self) -> CouponKind {
        match self {
            CouponValue::Percentage(_) => CouponKind::Percentage,
            CouponValue::Fixed(_) => CouponKind::Fixed,
        }
    }

    fn check(&self) -> Result<(), CouponDefinitionError> {
        match *self {
            CouponValue::Percentage(percent) if percent <= Decimal::ZERO => {
                Err(CouponDefinitionError::NonPositiveValue)
            }
            CouponValue::Percentage(percent) if percent > Decimal::ONE_HUNDRED => {
                Err(CouponDefinitionError::PercentageAboveHundred(percent))
            }
            // Stored as NUMERIC(5, 2).
            CouponValue::Percentage(percent) if percent.normalize().scale() > 2 => {
                Err(CouponDefinitionError::PercentagePrecision(percent))
            }
            CouponValue::Fixed(amount) if amount.is_zero() => {
                Err(CouponDefinitionError::NonPositiveValue)
            }
            _ => Ok(()),
        }
    }
}

/// An admin-defined discount rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique code
    pub code: CouponCode,

    /// Discount granted
    pub value: CouponValue,

    /// Minimum subtotal required
    #[serde(default)]
    pub minimum: Price,

    /// Maximum number of uses, if capped
    #[serde(default)]
    pub usage_cap: Option<u32>,

    /// Uses recorded so far
    #[serde(default)]
    pub usage_count: u32,

    /// Whether the coupon can be used
    pub active: bool,

    /// Point after which the coupon can no longer be used
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

impl Coupon {
    /// Creates an active, uncapped, non-expiring coupon with no minimum.
    pub fn new(code: CouponCode, value: CouponValue) -> Self {
        Self {
            code,
            value,
            minimum: Price::ZERO,
            usage_cap: None,
            usage_count: 0,
            active: true,
            expires_at: None,
        }
    }

    /// Checks the definition is usable as stored.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponDefinitionError`] describing the first problem found.
    pub fn check(&self) -> Result<(), CouponDefinitionError> {
        self.value.check()?;

        if self.usage_cap == Some(0) {
            return Err(CouponDefinitionError::ZeroUsageCap);
        }

        if let Some(cap) = self.usage_cap
            && self.usage_count > cap
        {
            return Err(CouponDefinitionError::UsageAboveCap {
                count: self.usage_count,
                cap,
            });
        }

        Ok(())
    }

    /// Returns true once the expiry has passed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    /// Returns true once the usage cap has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.usage_cap.is_some_and(|cap| self.usage_count >= cap)
    }
}
