//! Loyalty Accounts Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use sorveteria_app::domain::loyalty::records::LoyaltyAccount;

use crate::{
    extensions::*,
    loyalty::{
        errors::into_status_error,
        handlers::{LoyaltyCustomerResponse, LoyaltyTransactionResponse},
    },
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoyaltyAccountResponse {
    pub customer: LoyaltyCustomerResponse,

    /// Newest entries first
    pub recent_transactions: Vec<LoyaltyTransactionResponse>,
}

impl From<LoyaltyAccount> for LoyaltyAccountResponse {
    fn from(account: LoyaltyAccount) -> Self {
        Self {
            customer: account.customer.into(),
            recent_transactions: account
                .recent_transactions
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoyaltyAccountsResponse {
    pub accounts: Vec<LoyaltyAccountResponse>,
}

/// Loyalty Accounts Handler
#[endpoint(
    tags("admin"),
    summary = "List Loyalty Accounts",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<LoyaltyAccountsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let accounts = state
        .app
        .loyalty
        .list_accounts(state.loyalty_recent_transactions)
        .await
        .map_err(into_status_error)?;

    Ok(Json(LoyaltyAccountsResponse {
        accounts: accounts.into_iter().map(Into::into).collect(),
    }))
}
