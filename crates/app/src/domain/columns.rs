//! Column conversions shared by repositories.

use sorveteria::prices::Price;
use sqlx::{Row, postgres::PgRow};

pub(crate) fn price_to_i64(price: Price, column: &'static str) -> Result<i64, sqlx::Error> {
    i64::try_from(price.minor_units()).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn price_column(row: &PgRow, column: &'static str) -> Result<Price, sqlx::Error> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value)
        .map(Price::new)
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

pub(crate) fn parsed_column<T>(row: &PgRow, column: &'static str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn position(index: usize) -> Result<i32, sqlx::Error> {
    i32::try_from(index).map_err(|e| sqlx::Error::ColumnDecode {
        index: "position".to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn count_to_i32(count: u32, column: &'static str) -> Result<i32, sqlx::Error> {
    i32::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn count_column(row: &PgRow, column: &'static str) -> Result<u32, sqlx::Error> {
    let value: i32 = row.try_get(column)?;

    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
