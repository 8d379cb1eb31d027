//! Catalog Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    catalog::records::{AdditionalRecord, FlavorRecord},
    columns::price_column,
};

const GET_FLAVORS_SQL: &str = include_str!("sql/get_flavors.sql");
const GET_ADDITIONALS_SQL: &str = include_str!("sql/get_additionals.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_flavors(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuids: &[Uuid],
    ) -> Result<Vec<FlavorRecord>, sqlx::Error> {
        query_as::<Postgres, FlavorRecord>(GET_FLAVORS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_additionals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuids: &[Uuid],
    ) -> Result<Vec<AdditionalRecord>, sqlx::Error> {
        query_as::<Postgres, AdditionalRecord>(GET_ADDITIONALS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for FlavorRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            active: row.try_get("active")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AdditionalRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            price: price_column(row, "price")?,
            active: row.try_get("active")?,
        })
    }
}
