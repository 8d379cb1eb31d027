//! Order Records

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use sorveteria::{
    coupons::CouponCode,
    orders::OrderStatus,
    pots::{AdditionalRef, FlavorRef, RefSet},
    prices::Price,
};

use crate::{domain::customers::records::CustomerUuid, uuids::TypedUuid};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub size_label: String,
    pub flavors: RefSet<FlavorRef>,
    pub additionals: RefSet<AdditionalRef>,
    pub subtotal: Price,
    pub discount: Price,
    pub total: Price,
    pub coupon_code: Option<CouponCode>,
    pub payment_method: String,
    pub delivery_address: String,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Dashboard figures across all orders.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderStats {
    pub total_orders: u64,
    pub revenue: Price,
    pub by_status: FxHashMap<OrderStatus, u64>,
    pub recent: Vec<OrderRecord>,
}
