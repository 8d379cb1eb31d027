//! Coupons Data

use sorveteria::coupons::Coupon;

/// Coupon create-or-update payload, keyed by code.
///
/// `coupon.usage_count` is only used when the coupon is created; updates keep
/// the stored count.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponUpsert {
    pub coupon: Coupon,
    pub description: Option<String>,
}
