//! Loyalty Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sorveteria_app::domain::{
    customers::records::CustomerRecord, loyalty::records::LoyaltyTransactionRecord,
};

pub(crate) mod adjust;
pub(crate) mod index;
pub(crate) mod transactions;

/// Customer with their points balance.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoyaltyCustomerResponse {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,

    /// Current balance
    pub loyalty_points: i64,
}

impl From<CustomerRecord> for LoyaltyCustomerResponse {
    fn from(customer: CustomerRecord) -> Self {
        Self {
            uuid: customer.uuid.into_uuid(),
            name: customer.name,
            email: customer.email,
            loyalty_points: customer.loyalty_points,
        }
    }
}

/// Ledger entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoyaltyTransactionResponse {
    pub uuid: Uuid,

    /// Signed change; negative for redeems
    pub points: i64,

    /// `earn` or `redeem`
    #[serde(rename = "type")]
    pub kind: String,

    pub description: Option<String>,
    pub created_at: String,
}

impl From<LoyaltyTransactionRecord> for LoyaltyTransactionResponse {
    fn from(transaction: LoyaltyTransactionRecord) -> Self {
        Self {
            uuid: transaction.uuid.into_uuid(),
            points: transaction.points,
            kind: transaction.kind.label().to_string(),
            description: transaction.description,
            created_at: transaction.created_at.to_string(),
        }
    }
}
