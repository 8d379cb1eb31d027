//! State

use std::sync::Arc;

use sorveteria_app::context::AppContext;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Ledger entries shown per customer on the loyalty overview.
    pub(crate) loyalty_recent_transactions: u32,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, loyalty_recent_transactions: u32) -> Self {
        Self {
            app,
            loyalty_recent_transactions,
        }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext, loyalty_recent_transactions: u32) -> Arc<Self> {
        Arc::new(Self::new(app, loyalty_recent_transactions))
    }
}
