//! Toggle Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    coupons::{errors::into_status_error, handlers::index::CouponResponse},
    extensions::*,
    state::State,
};

/// Toggle Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ToggleCouponRequest {
    /// Whether the coupon can be used
    pub active: bool,
}

/// Toggle Coupon Handler
#[endpoint(
    tags("admin"),
    summary = "Enable or Disable Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    code: PathParam<String>,
    json: JsonBody<ToggleCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let active = json.into_inner().active;

    let coupon = state
        .app
        .coupons
        .set_active(code.into_inner(), active)
        .await
        .map_err(into_status_error)?;

    tracing::info!(code = %coupon.coupon.code, active, "toggled coupon");

    Ok(Json(coupon.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use sorveteria::coupons::CouponCode;
    use sorveteria_app::domain::coupons::{CouponsServiceError, MockCouponsService};

    use crate::{
        coupons::handlers::tests::make_coupon,
        test_helpers::{TEST_ADMIN, TestServices},
    };

    use super::*;

    fn make_service(coupons: MockCouponsService) -> Service {
        TestServices {
            coupons,
            ..TestServices::default()
        }
        .serve(
            TEST_ADMIN,
            Router::with_path("admin/coupons/{code}").patch(handler),
        )
    }

    #[tokio::test]
    async fn test_toggle_disables_coupon() -> TestResult {
        let mut record = make_coupon(CouponCode::parse("VERAO10")?);

        record.coupon.active = false;

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_set_active()
            .once()
            .withf(|code, active| code == "verao10" && !*active)
            .return_once(move |_, _| Ok(record));

        let mut res = TestClient::patch("http://example.com/admin/coupons/verao10")
            .json(&json!({ "active": false }))
            .send(&make_service(coupons))
            .await;

        let body: CouponResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!body.active, "expected coupon to be inactive");

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_unknown_code_returns_404() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_set_active()
            .once()
            .return_once(|_, _| Err(CouponsServiceError::NotFound));

        let res = TestClient::patch("http://example.com/admin/coupons/NADA")
            .json(&json!({ "active": true }))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_missing_flag_returns_400() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons.expect_set_active().never();

        let res = TestClient::patch("http://example.com/admin/coupons/VERAO10")
            .json(&json!({}))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
