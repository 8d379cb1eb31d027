//! Favorites Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sorveteria::{
    favorites::FavoritePot,
    pots::{AdditionalRef, FlavorRef, RefSet},
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    columns::{parsed_column, position, price_column, price_to_i64},
    customers::records::CustomerUuid,
    favorites::records::{FavoriteRecord, FavoriteUuid},
};

const CREATE_FAVORITE_SQL: &str = include_str!("sql/create_favorite.sql");
const CREATE_FAVORITE_FLAVOR_SQL: &str = include_str!("sql/create_favorite_flavor.sql");
const CREATE_FAVORITE_ADDITIONAL_SQL: &str = include_str!("sql/create_favorite_additional.sql");
const LIST_FAVORITES_SQL: &str = include_str!("sql/list_favorites.sql");
const DELETE_FAVORITE_SQL: &str = include_str!("sql/delete_favorite.sql");
const GET_FAVORITE_FLAVORS_SQL: &str = include_str!("sql/get_favorite_flavors.sql");
const GET_FAVORITE_ADDITIONALS_SQL: &str = include_str!("sql/get_favorite_additionals.sql");

#[derive(Debug)]
struct FavoriteLine {
    favorite_uuid: Uuid,
    uuid: Uuid,
    name: String,
}

impl<'r> FromRow<'r, PgRow> for FavoriteLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            favorite_uuid: row.try_get("favorite_uuid")?,
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgFavoritesRepository;

impl PgFavoritesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_favorite(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: FavoriteUuid,
        customer: CustomerUuid,
        favorite: &FavoritePot,
    ) -> Result<FavoriteRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, FavoriteRecord>(CREATE_FAVORITE_SQL)
            .bind(uuid.into_uuid())
            .bind(customer.into_uuid())
            .bind(favorite.name.trim())
            .bind(favorite.size.label())
            .bind(price_to_i64(favorite.price, "price")?)
            .fetch_one(&mut **tx)
            .await?;

        for (index, flavor) in favorite.flavors.iter().enumerate() {
            query(CREATE_FAVORITE_FLAVOR_SQL)
                .bind(uuid.into_uuid())
                .bind(flavor.uuid)
                .bind(position(index)?)
                .execute(&mut **tx)
                .await?;
        }

        for (index, additional) in favorite.additionals.iter().enumerate() {
            query(CREATE_FAVORITE_ADDITIONAL_SQL)
                .bind(uuid.into_uuid())
                .bind(additional.uuid)
                .bind(position(index)?)
                .execute(&mut **tx)
                .await?;
        }

        self.attach_lines(tx, std::slice::from_mut(&mut record)).await?;

        Ok(record)
    }

    pub(crate) async fn list_favorites(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<FavoriteRecord>, sqlx::Error> {
        let mut records = query_as::<Postgres, FavoriteRecord>(LIST_FAVORITES_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        self.attach_lines(tx, &mut records).await?;

        Ok(records)
    }

    /// Returns false when no favorite with that uuid belongs to `customer`.
    pub(crate) async fn delete_favorite(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        favorite: FavoriteUuid,
    ) -> Result<bool, sqlx::Error> {
        let result = query(DELETE_FAVORITE_SQL)
            .bind(favorite.into_uuid())
            .bind(customer.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn attach_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        records: &mut [FavoriteRecord],
    ) -> Result<(), sqlx::Error> {
        if records.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = records.iter().map(|record| record.uuid.into_uuid()).collect();

        let flavors = query_as::<Postgres, FavoriteLine>(GET_FAVORITE_FLAVORS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let additionals = query_as::<Postgres, FavoriteLine>(GET_FAVORITE_ADDITIONALS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut by_favorite: FxHashMap<Uuid, &mut FavoriteRecord> = records
            .iter_mut()
            .map(|record| (record.uuid.into_uuid(), record))
            .collect();

        for line in flavors {
            if let Some(record) = by_favorite.get_mut(&line.favorite_uuid) {
                record.favorite.flavors.insert(FlavorRef {
                    uuid: line.uuid,
                    name: line.name,
                });
            }
        }

        for line in additionals {
            if let Some(record) = by_favorite.get_mut(&line.favorite_uuid) {
                record.favorite.additionals.insert(AdditionalRef {
                    uuid: line.uuid,
                    name: line.name,
                });
            }
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for FavoriteRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: FavoriteUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            favorite: FavoritePot {
                name: row.try_get("name")?,
                size: parsed_column(row, "size")?,
                price: price_column(row, "price")?,
                flavors: RefSet::new(),
                additionals: RefSet::new(),
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
