//! Orders Data

use sorveteria::orders::{InitialStatus, TransitionPolicy};

/// Checkout behavior chosen at deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Status given to new orders.
    pub initial_status: InitialStatus,

    /// Which status changes are allowed.
    pub transition_policy: TransitionPolicy,
}
