//! Coupon validation
//!
//! Validation is read-only: it never touches the usage counter. The result
//! comes in two trust levels. A [`PendingDiscount`] is what a cart caches
//! between steps and is only a hint. A [`ConfirmedDiscount`] can only be
//! produced by validating against the subtotal being charged, and is the
//! only form an order accepts.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    coupons::{Coupon, CouponCode, CouponKind, CouponValue},
    prices::Price,
    pricing::{PricingError, percent_of},
};

/// Reasons a coupon cannot be applied.
#[derive(Debug, Error, PartialEq)]
pub enum CouponError {
    /// No coupon with the code, or the coupon is inactive.
    #[error("coupon not found")]
    NotFound,

    /// The coupon expiry has passed.
    #[error("coupon has expired")]
    Expired,

    /// The usage cap has been reached.
    #[error("coupon usage limit reached")]
    UsageExceeded,

    /// The subtotal is below the coupon minimum.
    #[error("subtotal is below the coupon minimum of {minimum}")]
    BelowMinimum {
        /// Minimum subtotal required
        minimum: Price,
    },

    /// The discount could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Outcome of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponQuote {
    /// Normalized code
    pub code: CouponCode,

    /// Discount definition at validation time
    pub value: CouponValue,

    /// Subtotal the quote was computed against
    pub subtotal: Price,

    /// Discount granted; fixed discounts are not capped to the subtotal
    pub discount: Price,

    /// Amount payable, floored at zero
    pub total: Price,
}

impl CouponQuote {
    /// Cacheable form of the quote.
    pub fn pending(&self) -> PendingDiscount {
        PendingDiscount {
            code: self.code.clone(),
            kind: self.value.kind(),
            value: self.value,
            discount: self.discount,
            subtotal: self.subtotal,
        }
    }
}

/// A cached validation outcome.
///
/// Only valid for the subtotal it was computed against; never trusted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDiscount {
    /// Normalized code
    pub code: CouponCode,

    /// Discount kind
    pub kind: CouponKind,

    /// Raw value
    pub value: CouponValue,

    /// Discount computed at validation time
    pub discount: Price,

    /// Subtotal the discount was computed against
    pub subtotal: Price,
}

impl PendingDiscount {
    /// Returns true if the cached discount was computed for `subtotal`.
    pub fn is_current_for(&self, subtotal: Price) -> bool {
        self.subtotal == subtotal
    }
}

/// A discount re-validated against the subtotal being charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDiscount {
    code: CouponCode,
    subtotal: Price,
    applied: Price,
}

impl ConfirmedDiscount {
    /// Re-validates `coupon` against `subtotal`.
    ///
    /// # Errors
    ///
    /// See [`validate`].
    pub fn confirm(
        coupon: Option<&Coupon>,
        subtotal: Price,
        now: Timestamp,
    ) -> Result<Self, CouponError> {
        let quote = validate(coupon, subtotal, now)?;

        Ok(Self {
            code: quote.code,
            subtotal,
            applied: subtotal.saturating_sub(quote.total),
        })
    }

    /// Coupon code.
    pub fn code(&self) -> &CouponCode {
        &self.code
    }

    /// Subtotal the discount was confirmed for.
    pub fn subtotal(&self) -> Price {
        self.subtotal
    }

    /// Discount actually taken off the subtotal.
    pub fn applied(&self) -> Price {
        self.applied
    }

    /// Amount payable.
    pub fn total(&self) -> Price {
        self.subtotal.saturating_sub(self.applied)
    }
}

/// Validates a looked-up coupon against a subtotal.
///
/// `coupon` is the result of a code lookup; `None` means no coupon exists.
///
/// # Errors
///
/// Checks run in order and the first failure wins:
/// - [`CouponError::NotFound`]: no coupon, or it is inactive.
/// - [`CouponError::Expired`]: the expiry is in the past.
/// - [`CouponError::UsageExceeded`]: the usage cap has been reached.
/// - [`CouponError::BelowMinimum`]: the subtotal is below the minimum.
/// - [`CouponError::Pricing`]: the percentage could not be applied.
pub fn validate(
    coupon: Option<&Coupon>,
    subtotal: Price,
    now: Timestamp,
) -> Result<CouponQuote, CouponError> {
    let coupon = coupon
        .filter(|coupon| coupon.active)
        .ok_or(CouponError::NotFound)?;

    if coupon.is_expired(now) {
        return Err(CouponError::Expired);
    }

    if coupon.is_exhausted() {
        return Err(CouponError::UsageExceeded);
    }

    if subtotal < coupon.minimum {
        return Err(CouponError::BelowMinimum {
            minimum: coupon.minimum,
        });
    }

    let discount = match coupon.value {
        CouponValue::Percentage(percent) => percent_of(percent, subtotal)?,
        CouponValue::Fixed(amount) => amount,
    };

    Ok(CouponQuote {
        code: coupon.code.clone(),
        value: coupon.value,
        subtotal,
        discount,
        total: subtotal.saturating_sub(discount),
    })
}
