//! Catalog service errors.

use sqlx::Error;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("unknown catalog reference {0}")]
    InvalidReference(Uuid),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CatalogServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
