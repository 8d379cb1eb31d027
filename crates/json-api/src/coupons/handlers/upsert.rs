//! Upsert Coupon Handler

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use sorveteria::{
    coupons::{Coupon, CouponCode, CouponValue},
    prices::Price,
};
use sorveteria_app::domain::coupons::data::CouponUpsert;

use crate::{
    coupons::{errors::into_status_error, handlers::index::CouponResponse},
    extensions::*,
    state::State,
};

/// Upsert Coupon Request
///
/// Exactly one of `percentage` and `amount` must be set.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpsertCouponRequest {
    /// Coupon code; matched case-insensitively
    pub code: String,

    /// Percentage off, in `(0, 100]`
    #[serde(default)]
    pub percentage: Option<String>,

    /// Amount off in centavos
    #[serde(default)]
    pub amount: Option<u64>,

    /// Minimum subtotal in centavos
    #[serde(default)]
    pub minimum: u64,

    /// Maximum number of uses
    #[serde(default)]
    pub usage_cap: Option<u32>,

    /// RFC 3339 timestamp after which the coupon no longer applies
    #[serde(default)]
    pub expires_at: Option<String>,

    /// Whether the coupon can be used
    #[serde(default = "active_by_default")]
    pub active: bool,

    /// Operator note
    #[serde(default)]
    pub description: Option<String>,
}

fn active_by_default() -> bool {
    true
}

impl UpsertCouponRequest {
    fn into_upsert(self) -> Result<CouponUpsert, StatusError> {
        let code = CouponCode::parse(&self.code).or_400("Coupon code is required")?;

        let value = match (self.percentage, self.amount) {
            (Some(percentage), None) => CouponValue::Percentage(
                percentage
                    .trim()
                    .parse::<Decimal>()
                    .or_400("could not parse \"percentage\"")?,
            ),
            (None, Some(amount)) => CouponValue::Fixed(Price::new(amount)),
            _ => {
                return Err(StatusError::bad_request()
                    .brief("Exactly one of \"percentage\" or \"amount\" is required"));
            }
        };

        let expires_at = self
            .expires_at
            .map(|value| value.parse::<Timestamp>())
            .transpose()
            .or_400("could not parse \"expires_at\"")?;

        Ok(CouponUpsert {
            coupon: Coupon {
                minimum: Price::new(self.minimum),
                usage_cap: self.usage_cap,
                active: self.active,
                expires_at,
                ..Coupon::new(code, value)
            },
            description: self.description,
        })
    }
}

/// Upsert Coupon Handler
///
/// Creates the coupon, or updates the one with the same code. The usage
/// count of an existing coupon is kept.
#[endpoint(
    tags("admin"),
    summary = "Create or Update Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon saved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "coupons.upsert",
    skip(json, depot),
    fields(code = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<UpsertCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let upsert = json.into_inner().into_upsert()?;

    tracing::Span::current().record("code", tracing::field::display(&upsert.coupon.code));

    let coupon = state
        .app
        .coupons
        .upsert_coupon(upsert)
        .await
        .map_err(into_status_error)?;

    tracing::info!(code = %coupon.coupon.code, "saved coupon");

    Ok(Json(coupon.into()))
}
