//! Loyalty Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sorveteria::loyalty::PointsAdjustment;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    columns::parsed_column,
    customers::records::{CustomerRecord, CustomerUuid},
    loyalty::records::{LoyaltyTransactionRecord, LoyaltyTransactionUuid},
};

const APPLY_POINTS_SQL: &str = include_str!("sql/apply_points.sql");
const CREATE_TRANSACTION_SQL: &str = include_str!("sql/create_transaction.sql");
const LIST_CUSTOMERS_SQL: &str = include_str!("sql/list_customers.sql");
const RECENT_TRANSACTIONS_SQL: &str = include_str!("sql/recent_transactions.sql");
const CUSTOMER_TRANSACTIONS_SQL: &str = include_str!("sql/customer_transactions.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLoyaltyRepository;

impl PgLoyaltyRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Adds `delta` to the stored balance unless the result would be negative.
    ///
    /// Returns `None` when the customer is missing or the guard rejected the change.
    pub(crate) async fn apply_points(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        delta: i64,
    ) -> Result<Option<CustomerRecord>, sqlx::Error> {
        query_as::<Postgres, CustomerRecord>(APPLY_POINTS_SQL)
            .bind(customer.into_uuid())
            .bind(delta)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: LoyaltyTransactionUuid,
        customer: CustomerUuid,
        adjustment: &PointsAdjustment,
    ) -> Result<LoyaltyTransactionRecord, sqlx::Error> {
        query_as::<Postgres, LoyaltyTransactionRecord>(CREATE_TRANSACTION_SQL)
            .bind(uuid.into_uuid())
            .bind(customer.into_uuid())
            .bind(adjustment.delta())
            .bind(adjustment.kind().label())
            .bind(adjustment.description())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_customers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CustomerRecord>, sqlx::Error> {
        query_as::<Postgres, CustomerRecord>(LIST_CUSTOMERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Up to `limit` newest entries per customer.
    pub(crate) async fn recent_transactions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: i64,
    ) -> Result<Vec<LoyaltyTransactionRecord>, sqlx::Error> {
        query_as::<Postgres, LoyaltyTransactionRecord>(RECENT_TRANSACTIONS_SQL)
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn customer_transactions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<LoyaltyTransactionRecord>, sqlx::Error> {
        query_as::<Postgres, LoyaltyTransactionRecord>(CUSTOMER_TRANSACTIONS_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for LoyaltyTransactionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: LoyaltyTransactionUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            points: row.try_get("points")?,
            kind: parsed_column(row, "kind")?,
            description: row.try_get("description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
