//! Coupon Index Handler

use std::{string::ToString, sync::Arc};

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sorveteria_app::domain::coupons::records::CouponRecord;

use crate::{
    coupons::{errors::into_status_error, handlers::value_fields},
    extensions::*,
    state::State,
};

/// Coupon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    /// The unique identifier of the coupon
    pub uuid: Uuid,

    /// Normalized code
    pub code: String,

    /// Coupon type (`percentual` or `valor_fixo`)
    #[serde(rename = "type")]
    pub kind: String,

    /// Percentage off, for percentage coupons
    pub percentage: Option<String>,

    /// Amount off in centavos, for fixed coupons
    pub amount: Option<u64>,

    /// Minimum subtotal in centavos
    pub minimum: u64,

    /// Maximum number of uses
    pub usage_cap: Option<u32>,

    /// Uses recorded so far
    pub usage_count: u32,

    /// Whether the coupon can be used
    pub active: bool,

    /// The date and time after which the coupon no longer applies
    pub expires_at: Option<String>,

    /// Operator note
    pub description: Option<String>,

    /// The date and time the coupon was created
    pub created_at: String,

    /// The date and time the coupon was last updated
    pub updated_at: String,
}

impl From<CouponRecord> for CouponResponse {
    fn from(record: CouponRecord) -> Self {
        let coupon = record.coupon;
        let (percentage, amount) = value_fields(coupon.value);

        Self {
            uuid: record.uuid.into_uuid(),
            code: coupon.code.to_string(),
            kind: coupon.value.kind().to_string(),
            percentage,
            amount,
            minimum: coupon.minimum.minor_units(),
            usage_cap: coupon.usage_cap,
            usage_count: coupon.usage_count,
            active: coupon.active,
            expires_at: coupon.expires_at.as_ref().map(ToString::to_string),
            description: record.description,
            created_at: record.created_at.to_string(),
            updated_at: record.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponsResponse {
    /// Coupons, newest first
    pub coupons: Vec<CouponResponse>,
}

/// Coupon Index Handler
///
/// Returns every coupon, active or not.
#[endpoint(
    tags("admin"),
    summary = "List Coupons",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CouponsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let coupons = state
        .app
        .coupons
        .list_coupons()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CouponsResponse {
        coupons: coupons.into_iter().map(Into::into).collect(),
    }))
}
