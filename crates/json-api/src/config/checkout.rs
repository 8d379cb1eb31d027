//! Checkout Config

use clap::Args;
use sorveteria::orders::{InitialStatus, TransitionPolicy};
use sorveteria_app::domain::orders::data::CheckoutConfig;

/// Order lifecycle and loyalty listing settings.
#[derive(Debug, Args)]
pub struct CheckoutSettings {
    /// Status new orders start in (pendente, em-preparo)
    #[arg(long, env = "ORDER_INITIAL_STATUS", default_value = "pendente")]
    pub order_initial_status: InitialStatus,

    /// Which status changes are accepted (permissive, strict)
    #[arg(long, env = "ORDER_TRANSITION_POLICY", default_value = "permissive")]
    pub order_transition_policy: TransitionPolicy,

    /// Newest ledger entries shown per customer on the loyalty overview
    #[arg(long, env = "LOYALTY_RECENT_TRANSACTIONS", default_value_t = 5_u32)]
    pub loyalty_recent_transactions: u32,
}

impl CheckoutSettings {
    #[must_use]
    pub fn checkout_config(&self) -> CheckoutConfig {
        CheckoutConfig {
            initial_status: self.order_initial_status,
            transition_policy: self.order_transition_policy,
        }
    }
}
