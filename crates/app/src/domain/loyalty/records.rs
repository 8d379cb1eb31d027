//! Loyalty Records

use jiff::Timestamp;
use sorveteria::loyalty::PointsKind;

use crate::{
    domain::customers::records::{CustomerRecord, CustomerUuid},
    uuids::TypedUuid,
};

/// Loyalty Transaction UUID
pub type LoyaltyTransactionUuid = TypedUuid<LoyaltyTransactionRecord>;

/// One ledger entry. `points` is signed: negative for redeems.
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyTransactionRecord {
    pub uuid: LoyaltyTransactionUuid,
    pub customer_uuid: CustomerUuid,
    pub points: i64,
    pub kind: PointsKind,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// Outcome of a points adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyAdjustment {
    pub customer: CustomerRecord,
    pub transaction: LoyaltyTransactionRecord,
}

/// A customer with their balance and latest ledger entries.
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyAccount {
    pub customer: CustomerRecord,
    pub recent_transactions: Vec<LoyaltyTransactionRecord>,
}
