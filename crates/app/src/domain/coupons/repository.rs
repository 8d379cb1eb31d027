//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sorveteria::{
    coupons::{Coupon, CouponCode, CouponKind, CouponValue},
    prices::Price,
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    columns::{count_column, count_to_i32, parsed_column, price_column, price_to_i64},
    coupons::{
        data::CouponUpsert,
        records::{CouponRecord, CouponUuid},
    },
};

const UPSERT_COUPON_SQL: &str = include_str!("sql/upsert_coupon.sql");
const SET_COUPON_ACTIVE_SQL: &str = include_str!("sql/set_coupon_active.sql");
const GET_COUPON_SQL: &str = include_str!("sql/get_coupon.sql");
const LOCK_COUPON_SQL: &str = include_str!("sql/lock_coupon.sql");
const LIST_COUPONS_SQL: &str = include_str!("sql/list_coupons.sql");
const RESERVE_COUPON_USAGE_SQL: &str = include_str!("sql/reserve_coupon_usage.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn upsert_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CouponUuid,
        upsert: &CouponUpsert,
    ) -> Result<CouponRecord, sqlx::Error> {
        let coupon = &upsert.coupon;

        let (percentage, amount) = match coupon.value {
            CouponValue::Percentage(percent) => (Some(percent), None),
            CouponValue::Fixed(amount) => (None, Some(price_to_i64(amount, "amount")?)),
        };

        query_as::<Postgres, CouponRecord>(UPSERT_COUPON_SQL)
            .bind(uuid.into_uuid())
            .bind(coupon.code.as_str())
            .bind(coupon.value.kind().label())
            .bind(percentage)
            .bind(amount)
            .bind(price_to_i64(coupon.minimum, "minimum")?)
            .bind(
                coupon
                    .usage_cap
                    .map(|cap| count_to_i32(cap, "usage_cap"))
                    .transpose()?,
            )
            .bind(count_to_i32(coupon.usage_count, "usage_count")?)
            .bind(coupon.active)
            .bind(coupon.expires_at.map(SqlxTimestamp::from))
            .bind(upsert.description.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_coupon_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &CouponCode,
        active: bool,
    ) -> Result<CouponRecord, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(SET_COUPON_ACTIVE_SQL)
            .bind(code.as_str())
            .bind(active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &CouponCode,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(GET_COUPON_SQL)
            .bind(code.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like `find_coupon`, holding a row lock until the transaction ends.
    pub(crate) async fn lock_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &CouponCode,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LOCK_COUPON_SQL)
            .bind(code.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LIST_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Counts one use. Returns false when the coupon is inactive or its cap is reached.
    pub(crate) async fn reserve_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &CouponCode,
    ) -> Result<bool, sqlx::Error> {
        let result = query(RESERVE_COUPON_USAGE_SQL)
            .bind(code.as_str())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

fn coupon_value(row: &PgRow) -> Result<CouponValue, sqlx::Error> {
    match parsed_column::<CouponKind>(row, "kind")? {
        CouponKind::Percentage => {
            let percent: Decimal = row.try_get("percentage")?;

            Ok(CouponValue::Percentage(percent.normalize()))
        }
        CouponKind::Fixed => {
            let amount: Option<i64> = row.try_get("amount")?;
            let amount = amount.ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "amount".to_string(),
                source: "fixed coupon without amount".into(),
            })?;

            u64::try_from(amount)
                .map(|amount| CouponValue::Fixed(Price::new(amount)))
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "amount".to_string(),
                    source: Box::new(e),
                })
        }
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let code: String = row.try_get("code")?;

        let code = CouponCode::parse(&code).map_err(|e| sqlx::Error::ColumnDecode {
            index: "code".to_string(),
            source: Box::new(e),
        })?;

        let usage_cap = row
            .try_get::<Option<i32>, _>("usage_cap")?
            .map(|cap| {
                u32::try_from(cap).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "usage_cap".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        let coupon = Coupon {
            code,
            value: coupon_value(row)?,
            minimum: price_column(row, "minimum")?,
            usage_cap,
            usage_count: count_column(row, "usage_count")?,
            active: row.try_get("active")?,
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
        };

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            coupon,
            description: row.try_get("description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
