//! Loyalty
//!
//! Point adjustments are always positive amounts paired with a kind; the
//! signed delta is derived from the kind. A redeem may never leave a balance
//! below zero.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors adjusting a loyalty balance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoyaltyError {
    /// Points must be greater than zero.
    #[error("points must be a positive number")]
    NonPositivePoints,

    /// The kind is not `earn` or `redeem`.
    #[error("invalid points type: {0:?}")]
    InvalidKind(String),

    /// The redeem would leave the balance negative.
    #[error("insufficient points: balance {balance}, requested {requested}")]
    InsufficientPoints {
        /// Balance before the redeem
        balance: i64,

        /// Points requested
        requested: u32,
    },

    /// The resulting balance does not fit.
    #[error("points balance overflow")]
    Overflow,
}

/// Direction of a points adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointsKind {
    /// Points awarded
    Earn,

    /// Points spent
    Redeem,
}

impl PointsKind {
    /// Wire label.
    pub const fn label(self) -> &'static str {
        match self {
            PointsKind::Earn => "earn",
            PointsKind::Redeem => "redeem",
        }
    }
}

impl fmt::Display for PointsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PointsKind {
    type Err = LoyaltyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earn" => Ok(PointsKind::Earn),
            "redeem" => Ok(PointsKind::Redeem),
            _ => Err(LoyaltyError::InvalidKind(s.to_string())),
        }
    }
}

/// A validated request to move points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsAdjustment {
    points: u32,
    kind: PointsKind,
    description: Option<String>,
}

impl PointsAdjustment {
    /// Creates an adjustment of `points` in the direction of `kind`.
    ///
    /// Blank descriptions are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`LoyaltyError::NonPositivePoints`] when `points` is zero.
    pub fn new(
        points: u32,
        kind: PointsKind,
        description: Option<String>,
    ) -> Result<Self, LoyaltyError> {
        if points == 0 {
            return Err(LoyaltyError::NonPositivePoints);
        }

        let description = description
            .map(|description| description.trim().to_string())
            .filter(|description| !description.is_empty());

        Ok(Self {
            points,
            kind,
            description,
        })
    }

    /// Points moved.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Direction.
    pub fn kind(&self) -> PointsKind {
        self.kind
    }

    /// Optional note for the ledger.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Signed change applied to the balance.
    pub fn delta(&self) -> i64 {
        match self.kind {
            PointsKind::Earn => i64::from(self.points),
            PointsKind::Redeem => -i64::from(self.points),
        }
    }

    /// Balance after applying this adjustment to `balance`.
    ///
    /// # Errors
    ///
    /// - [`LoyaltyError::InsufficientPoints`]: a redeem would go below zero.
    /// - [`LoyaltyError::Overflow`]: the balance would not fit.
    pub fn apply_to(&self, balance: i64) -> Result<i64, LoyaltyError> {
        let next = balance
            .checked_add(self.delta())
            .ok_or(LoyaltyError::Overflow)?;

        if next < 0 {
            return Err(LoyaltyError::InsufficientPoints {
                balance,
                requested: self.points,
            });
        }

        Ok(next)
    }
}

/// Sum of ledger deltas; equals the balance for a consistent account.
pub fn balance_of(deltas: impl IntoIterator<Item = i64>) -> i64 {
    deltas.into_iter().sum()
}
