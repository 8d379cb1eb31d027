//! Validate Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use sorveteria::{
    coupons::{CouponError, CouponQuote},
    prices::Price,
};
use sorveteria_app::domain::coupons::CouponsServiceError;

use crate::{
    coupons::{errors::into_status_error, handlers::value_fields},
    extensions::*,
    observability::record_coupon_validation,
    state::State,
};

/// Coupon Quote Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponQuoteResponse {
    /// Normalized coupon code
    pub code: String,

    /// Coupon type (`percentual` or `valor_fixo`)
    #[serde(rename = "type")]
    pub kind: String,

    /// Percentage off, for percentage coupons
    pub percentage: Option<String>,

    /// Amount off in centavos, for fixed coupons
    pub amount: Option<u64>,

    /// Subtotal the quote was priced against, in centavos
    pub subtotal: u64,

    /// Discount in centavos
    pub discount: u64,

    /// Subtotal minus discount, never below zero
    pub total: u64,
}

impl From<CouponQuote> for CouponQuoteResponse {
    fn from(quote: CouponQuote) -> Self {
        let (percentage, amount) = value_fields(quote.value);

        Self {
            code: quote.code.to_string(),
            kind: quote.value.kind().to_string(),
            percentage,
            amount,
            subtotal: quote.subtotal.minor_units(),
            discount: quote.discount.minor_units(),
            total: quote.total.minor_units(),
        }
    }
}

/// Validate Coupon Handler
///
/// Prices a subtotal with a coupon. Never counts a use.
#[endpoint(
    tags("coupons"),
    summary = "Validate Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon applies"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown or inactive coupon"),
        (status_code = StatusCode::BAD_REQUEST, description = "Coupon cannot be applied"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    code: QueryParam<String, true>,
    subtotal: QueryParam<u64, true>,
    depot: &mut Depot,
) -> Result<Json<CouponQuoteResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.principal_or_401()?;

    let result = state
        .app
        .coupons
        .validate_coupon(code.into_inner(), Price::new(subtotal.into_inner()))
        .await;

    record_coupon_validation(outcome_label(&result));

    Ok(Json(result.map_err(into_status_error)?.into()))
}

fn outcome_label(result: &Result<CouponQuote, CouponsServiceError>) -> &'static str {
    let Err(error) = result else {
        return "accepted";
    };

    match error {
        CouponsServiceError::NotFound | CouponsServiceError::Inapplicable(CouponError::NotFound) => {
            "not_found"
        }
        CouponsServiceError::Inapplicable(CouponError::Expired) => "expired",
        CouponsServiceError::Inapplicable(CouponError::UsageExceeded) => "usage_exceeded",
        CouponsServiceError::Inapplicable(CouponError::BelowMinimum { .. }) => "below_minimum",
        _ => "error",
    }
}
