//! Coupon Handlers

pub(crate) mod index;
pub(crate) mod toggle;
pub(crate) mod upsert;
pub(crate) mod validate;

use sorveteria::coupons::CouponValue;

/// Splits a coupon value into its wire fields: percentage or amount.
pub(crate) fn value_fields(value: CouponValue) -> (Option<String>, Option<u64>) {
    match value {
        CouponValue::Percentage(percentage) => (Some(percentage.normalize().to_string()), None),
        CouponValue::Fixed(amount) => (None, Some(amount.minor_units())),
    }
}
