//! Order status machine

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors changing an order's status.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    /// The status is not one of the known labels.
    #[error("invalid order status: {0:?}")]
    InvalidStatus(String),

    /// The configured policy forbids the move.
    #[error("cannot move order from {from} to {to}")]
    TransitionNotAllowed {
        /// Current status
        from: OrderStatus,

        /// Requested status
        to: OrderStatus,
    },
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed, waiting for the shop
    #[serde(rename = "Pendente")]
    Pending,

    /// Being prepared
    #[serde(rename = "Em preparo")]
    Preparing,

    /// With the courier
    #[serde(rename = "Saiu para a entrega")]
    OutForDelivery,

    /// Delivered
    #[serde(rename = "Entregue")]
    Delivered,

    /// Cancelled
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl OrderStatus {
    /// Every status in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Stored and displayed label.
    pub const fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendente",
            OrderStatus::Preparing => "Em preparo",
            OrderStatus::OutForDelivery => "Saiu para a entrega",
            OrderStatus::Delivered => "Entregue",
            OrderStatus::Cancelled => "Cancelado",
        }
    }

    /// Terminal by convention; only enforced under [`TransitionPolicy::Strict`].
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Statuses reachable under [`TransitionPolicy::Strict`].
    pub const fn strict_successors(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::OutForDelivery, OrderStatus::Cancelled],
            OrderStatus::OutForDelivery => &[OrderStatus::Delivered, OrderStatus::Cancelled],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| StatusError::InvalidStatus(s.to_string()))
    }
}

/// Status a new order starts in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitialStatus {
    /// Orders wait for explicit confirmation.
    #[default]
    Pending,

    /// Orders go straight into preparation.
    Preparing,
}

impl InitialStatus {
    /// The status assigned at creation.
    pub const fn status(self) -> OrderStatus {
        match self {
            InitialStatus::Pending => OrderStatus::Pending,
            InitialStatus::Preparing => OrderStatus::Preparing,
        }
    }
}

impl FromStr for InitialStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pendente" => Ok(InitialStatus::Pending),
            "em-preparo" => Ok(InitialStatus::Preparing),
            _ => Err(StatusError::InvalidStatus(s.to_string())),
        }
    }
}

/// Which status changes are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any status may follow any status.
    #[default]
    Permissive,

    /// Only forward moves along the lifecycle, or cancellation, are accepted.
    Strict,
}

impl FromStr for TransitionPolicy {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            _ => Err(StatusError::InvalidStatus(s.to_string())),
        }
    }
}

/// Applies a [`TransitionPolicy`] to requested status changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusMachine {
    policy: TransitionPolicy,
}

impl StatusMachine {
    /// Creates a machine enforcing `policy`.
    pub const fn new(policy: TransitionPolicy) -> Self {
        Self { policy }
    }

    /// Policy in force.
    pub const fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Checks a move from `from` to `to`.
    ///
    /// Staying in the same status is always accepted.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::TransitionNotAllowed`] under the strict policy
    /// when `to` is not a successor of `from`.
    pub fn transition(&self, from: OrderStatus, to: OrderStatus) -> Result<OrderStatus, StatusError> {
        match self.policy {
            TransitionPolicy::Permissive => Ok(to),
            TransitionPolicy::Strict if from == to || from.strict_successors().contains(&to) => {
                Ok(to)
            }
            TransitionPolicy::Strict => Err(StatusError::TransitionNotAllowed { from, to }),
        }
    }
}
