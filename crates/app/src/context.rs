//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        catalog::{CatalogService, PgCatalogService},
        coupons::{CouponsService, PgCouponsService},
        customers::{CustomersService, PgCustomersService},
        favorites::{FavoritesService, PgFavoritesService},
        loyalty::{LoyaltyService, PgLoyaltyService},
        orders::{OrdersService, PgOrdersService, data::CheckoutConfig},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub customers: Arc<dyn CustomersService>,
    pub catalog: Arc<dyn CatalogService>,
    pub coupons: Arc<dyn CouponsService>,
    pub orders: Arc<dyn OrdersService>,
    pub loyalty: Arc<dyn LoyaltyService>,
    pub favorites: Arc<dyn FavoritesService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting or migrating fails.
    pub async fn from_database_url(
        url: &str,
        checkout: CheckoutConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        let db = Db::new(pool.clone());

        Ok(Self {
            customers: Arc::new(PgCustomersService::new(db.clone())),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), checkout)),
            loyalty: Arc::new(PgLoyaltyService::new(db.clone())),
            favorites: Arc::new(PgFavoritesService::new(db)),
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }
}
