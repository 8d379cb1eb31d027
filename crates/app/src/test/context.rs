//! Test context for service-level integration tests.

use sqlx::query;
use uuid::Uuid;

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        catalog::PgCatalogService,
        coupons::PgCouponsService,
        customers::{
            CustomersService, PgCustomersService,
            data::NewCustomer,
            records::CustomerUuid,
        },
        favorites::PgFavoritesService,
        loyalty::PgLoyaltyService,
        orders::{PgOrdersService, data::CheckoutConfig},
    },
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub customers: PgCustomersService,
    pub catalog: PgCatalogService,
    pub coupons: PgCouponsService,
    pub orders: PgOrdersService,
    pub loyalty: PgLoyaltyService,
    pub favorites: PgFavoritesService,
    pub auth: PgAuthService,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_checkout(CheckoutConfig::default()).await
    }

    /// Context whose order service uses `checkout` instead of the defaults.
    pub async fn with_checkout(checkout: CheckoutConfig) -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            customers: PgCustomersService::new(db.clone()),
            catalog: PgCatalogService::new(db.clone()),
            coupons: PgCouponsService::new(db.clone()),
            orders: PgOrdersService::new(db.clone(), checkout),
            loyalty: PgLoyaltyService::new(db.clone()),
            favorites: PgFavoritesService::new(db),
            auth: PgAuthService::new(test_db.pool().clone()),
            db: test_db,
        }
    }

    /// Registers a customer with a unique email.
    pub async fn create_customer(&self, name: &str) -> CustomerUuid {
        let uuid = CustomerUuid::new();

        self.customers
            .create_customer(NewCustomer {
                uuid,
                name: name.to_string(),
                email: format!("{}@example.com", uuid.into_uuid().simple()),
            })
            .await
            .expect("Failed to create test customer");

        uuid
    }

    /// Seeds an active flavor; the catalog is read-only to the services.
    pub async fn create_flavor(&self, name: &str) -> Uuid {
        let uuid = Uuid::now_v7();

        query("INSERT INTO flavors (uuid, name) VALUES ($1, $2)")
            .bind(uuid)
            .bind(name)
            .execute(self.db.pool())
            .await
            .expect("Failed to seed flavor");

        uuid
    }

    /// Seeds an active additional priced in centavos.
    pub async fn create_additional(&self, name: &str, price: u64) -> Uuid {
        let uuid = Uuid::now_v7();
        let price = i64::try_from(price).expect("additional price out of range");

        query("INSERT INTO additionals (uuid, name, price) VALUES ($1, $2, $3)")
            .bind(uuid)
            .bind(name)
            .bind(price)
            .execute(self.db.pool())
            .await
            .expect("Failed to seed additional");

        uuid
    }
}
