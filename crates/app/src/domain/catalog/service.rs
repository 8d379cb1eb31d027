//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        records::{AdditionalRecord, FlavorRecord},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

/// Orders `records` to match `uuids`, failing on the first identifier not found.
fn in_request_order<T, F>(
    uuids: &[Uuid],
    records: Vec<T>,
    uuid_of: F,
) -> Result<Vec<T>, CatalogServiceError>
where
    T: Clone,
    F: Fn(&T) -> Uuid,
{
    uuids
        .iter()
        .map(|uuid| {
            records
                .iter()
                .find(|record| uuid_of(record) == *uuid)
                .cloned()
                .ok_or(CatalogServiceError::InvalidReference(*uuid))
        })
        .collect()
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(
        name = "catalog.service.get_flavors",
        skip(self, uuids),
        fields(requested = uuids.len()),
        err
    )]
    async fn get_flavors(&self, uuids: Vec<Uuid>) -> Result<Vec<FlavorRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.repository.get_flavors(&mut tx, &uuids).await?;

        tx.commit().await?;

        in_request_order(&uuids, records, |record| record.uuid)
    }

    #[tracing::instrument(
        name = "catalog.service.get_additionals",
        skip(self, uuids),
        fields(requested = uuids.len()),
        err
    )]
    async fn get_additionals(
        &self,
        uuids: Vec<Uuid>,
    ) -> Result<Vec<AdditionalRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.repository.get_additionals(&mut tx, &uuids).await?;

        tx.commit().await?;

        in_request_order(&uuids, records, |record| record.uuid)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Look up flavors by identifier, in the order requested.
    async fn get_flavors(&self, uuids: Vec<Uuid>) -> Result<Vec<FlavorRecord>, CatalogServiceError>;

    /// Look up additionals by identifier, in the order requested.
    async fn get_additionals(
        &self,
        uuids: Vec<Uuid>,
    ) -> Result<Vec<AdditionalRecord>, CatalogServiceError>;
}
