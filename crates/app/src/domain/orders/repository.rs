//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sorveteria::{
    coupons::CouponCode,
    orders::{OrderDraft, OrderStatus},
    pots::{AdditionalRef, FlavorRef, RefSet},
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    columns::{parsed_column, position, price_column, price_to_i64},
    customers::records::CustomerUuid,
    orders::records::{OrderRecord, OrderUuid},
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_FLAVOR_SQL: &str = include_str!("sql/create_order_flavor.sql");
const CREATE_ORDER_ADDITIONAL_SQL: &str = include_str!("sql/create_order_additional.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const GET_ORDER_FLAVORS_SQL: &str = include_str!("sql/get_order_flavors.sql");
const GET_ORDER_ADDITIONALS_SQL: &str = include_str!("sql/get_order_additionals.sql");
const GET_ORDER_TOTALS_SQL: &str = include_str!("sql/get_order_totals.sql");
const COUNT_ORDERS_BY_STATUS_SQL: &str = include_str!("sql/count_orders_by_status.sql");

/// A catalog entry linked to an order.
#[derive(Debug)]
struct OrderLine {
    order_uuid: Uuid,
    uuid: Uuid,
    name: String,
}

impl<'r> FromRow<'r, PgRow> for OrderLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_uuid: row.try_get("order_uuid")?,
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Inserts the order row and its flavor and additional links.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: OrderUuid,
        customer: CustomerUuid,
        draft: &OrderDraft,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(uuid.into_uuid())
            .bind(customer.into_uuid())
            .bind(draft.size_label())
            .bind(price_to_i64(draft.subtotal(), "subtotal")?)
            .bind(price_to_i64(draft.discount_value(), "discount")?)
            .bind(price_to_i64(draft.total(), "total")?)
            .bind(draft.coupon_code().map(CouponCode::as_str))
            .bind(draft.payment_method())
            .bind(draft.delivery_address())
            .bind(draft.status().label())
            .bind(SqlxTimestamp::from(draft.created_at()))
            .fetch_one(&mut **tx)
            .await?;

        for (index, flavor) in draft.flavors().iter().enumerate() {
            query(CREATE_ORDER_FLAVOR_SQL)
                .bind(uuid.into_uuid())
                .bind(flavor.uuid)
                .bind(position(index)?)
                .execute(&mut **tx)
                .await?;
        }

        for (index, additional) in draft.additionals().iter().enumerate() {
            query(CREATE_ORDER_ADDITIONAL_SQL)
                .bind(uuid.into_uuid())
                .bind(additional.uuid)
                .bind(position(index)?)
                .execute(&mut **tx)
                .await?;
        }

        self.attach_lines(tx, std::slice::from_mut(&mut record)).await?;

        Ok(record)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.attach_lines(tx, std::slice::from_mut(&mut record)).await?;

        Ok(record)
    }

    /// Current status of an order, locking its row until the transaction ends.
    pub(crate) async fn lock_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderStatus, sqlx::Error> {
        let record = query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(record.status)
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: Option<CustomerUuid>,
        limit: Option<i64>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut records = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(customer.map(CustomerUuid::into_uuid))
            .bind(limit)
            .fetch_all(&mut **tx)
            .await?;

        self.attach_lines(tx, &mut records).await?;

        Ok(records)
    }

    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.label())
            .fetch_one(&mut **tx)
            .await?;

        self.attach_lines(tx, std::slice::from_mut(&mut record)).await?;

        Ok(record)
    }

    /// Order count and summed totals.
    pub(crate) async fn order_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(i64, i64), sqlx::Error> {
        let row = query(GET_ORDER_TOTALS_SQL).fetch_one(&mut **tx).await?;

        Ok((row.try_get("total_orders")?, row.try_get("revenue")?))
    }

    pub(crate) async fn count_orders_by_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<FxHashMap<OrderStatus, i64>, sqlx::Error> {
        let rows = query(COUNT_ORDERS_BY_STATUS_SQL).fetch_all(&mut **tx).await?;

        rows.iter()
            .map(|row| -> Result<(OrderStatus, i64), sqlx::Error> {
                Ok((parsed_column(row, "status")?, row.try_get("orders")?))
            })
            .collect()
    }

    /// Loads catalog names for the flavors and additionals of `records`.
    async fn attach_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        records: &mut [OrderRecord],
    ) -> Result<(), sqlx::Error> {
        if records.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = records.iter().map(|record| record.uuid.into_uuid()).collect();

        let flavors = query_as::<Postgres, OrderLine>(GET_ORDER_FLAVORS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let additionals = query_as::<Postgres, OrderLine>(GET_ORDER_ADDITIONALS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut by_order: FxHashMap<Uuid, &mut OrderRecord> = records
            .iter_mut()
            .map(|record| (record.uuid.into_uuid(), record))
            .collect();

        for line in flavors {
            if let Some(record) = by_order.get_mut(&line.order_uuid) {
                record.flavors.insert(FlavorRef {
                    uuid: line.uuid,
                    name: line.name,
                });
            }
        }

        for line in additionals {
            if let Some(record) = by_order.get_mut(&line.order_uuid) {
                record.additionals.insert(AdditionalRef {
                    uuid: line.uuid,
                    name: line.name,
                });
            }
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let coupon_code = row
            .try_get::<Option<String>, _>("coupon_code")?
            .map(|code| {
                CouponCode::parse(&code).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "coupon_code".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            size_label: row.try_get("size_label")?,
            flavors: RefSet::new(),
            additionals: RefSet::new(),
            subtotal: price_column(row, "subtotal")?,
            discount: price_column(row, "discount")?,
            total: price_column(row, "total")?,
            coupon_code,
            payment_method: row.try_get("payment_method")?,
            delivery_address: row.try_get("delivery_address")?,
            status: parsed_column(row, "status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
