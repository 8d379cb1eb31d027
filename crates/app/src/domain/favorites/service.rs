//! Favorites service.

use async_trait::async_trait;
use mockall::automock;
use sorveteria::favorites::FavoritePot;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        customers::records::CustomerUuid,
        favorites::{
            errors::FavoritesServiceError,
            records::{FavoriteRecord, FavoriteUuid},
            repository::PgFavoritesRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgFavoritesService {
    db: Db,
    repository: PgFavoritesRepository,
}

impl PgFavoritesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgFavoritesRepository::new(),
        }
    }
}

#[async_trait]
impl FavoritesService for PgFavoritesService {
    #[tracing::instrument(
        name = "favorites.service.create_favorite",
        skip(self, favorite),
        fields(customer_uuid = %customer, size = %favorite.size),
        err
    )]
    async fn create_favorite(
        &self,
        customer: CustomerUuid,
        favorite: FavoritePot,
    ) -> Result<FavoriteRecord, FavoritesServiceError> {
        if favorite.name.trim().is_empty() {
            return Err(FavoritesServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .create_favorite(&mut tx, FavoriteUuid::new(), customer, &favorite)
            .await?;

        tx.commit().await?;

        info!(favorite_uuid = %record.uuid, "created favorite");

        Ok(record)
    }

    #[tracing::instrument(
        name = "favorites.service.list_favorites",
        skip(self),
        fields(customer_uuid = %customer),
        err
    )]
    async fn list_favorites(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<FavoriteRecord>, FavoritesServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.repository.list_favorites(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "favorites.service.delete_favorite",
        skip(self),
        fields(customer_uuid = %customer, favorite_uuid = %favorite),
        err
    )]
    async fn delete_favorite(
        &self,
        customer: CustomerUuid,
        favorite: FavoriteUuid,
    ) -> Result<(), FavoritesServiceError> {
        let mut tx = self.db.begin().await?;

        if !self
            .repository
            .delete_favorite(&mut tx, customer, favorite)
            .await?
        {
            return Err(FavoritesServiceError::NotFound);
        }

        tx.commit().await?;

        info!(favorite_uuid = %favorite, "deleted favorite");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait FavoritesService: Send + Sync {
    /// Saves a pot configuration for a customer.
    async fn create_favorite(
        &self,
        customer: CustomerUuid,
        favorite: FavoritePot,
    ) -> Result<FavoriteRecord, FavoritesServiceError>;

    /// A customer's favorites, newest first.
    async fn list_favorites(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<FavoriteRecord>, FavoritesServiceError>;

    /// Removes one of the customer's own favorites.
    async fn delete_favorite(
        &self,
        customer: CustomerUuid,
        favorite: FavoriteUuid,
    ) -> Result<(), FavoritesServiceError>;
}
