//! Adjust Points Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sorveteria::loyalty::{PointsAdjustment, PointsKind};
use sorveteria_app::domain::loyalty::records::LoyaltyAdjustment;

use crate::{
    extensions::*,
    loyalty::{
        errors::into_status_error,
        handlers::{LoyaltyCustomerResponse, LoyaltyTransactionResponse},
    },
    observability::record_loyalty_points,
    state::State,
};

/// Adjust Points Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdjustPointsRequest {
    /// Customer whose balance changes
    pub customer_uuid: Uuid,

    /// Positive amount of points
    pub points: u32,

    /// `earn` or `redeem`
    #[serde(rename = "type")]
    pub kind: String,

    /// Note for the ledger
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdjustPointsResponse {
    /// Customer with the new balance
    pub customer: LoyaltyCustomerResponse,

    /// Entry written to the ledger
    pub transaction: LoyaltyTransactionResponse,
}

impl From<LoyaltyAdjustment> for AdjustPointsResponse {
    fn from(adjustment: LoyaltyAdjustment) -> Self {
        Self {
            customer: adjustment.customer.into(),
            transaction: adjustment.transaction.into(),
        }
    }
}

/// Adjust Points Handler
///
/// Awards or redeems points; a redeem larger than the balance is refused.
#[endpoint(
    tags("admin"),
    summary = "Adjust Loyalty Points",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Points adjusted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid amount, type or insufficient points"),
        (status_code = StatusCode::NOT_FOUND, description = "Customer not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "loyalty.adjust", skip(json, depot), err)]
pub(crate) async fn handler(
    json: JsonBody<AdjustPointsRequest>,
    depot: &mut Depot,
) -> Result<Json<AdjustPointsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let request = json.into_inner();

    let kind: PointsKind = request.kind.parse().or_400("Invalid points type")?;
    let adjustment = PointsAdjustment::new(request.points, kind, request.description)
        .or_400("Invalid points amount")?;

    let points = adjustment.points();

    let adjustment = state
        .app
        .loyalty
        .adjust_points(request.customer_uuid.into(), adjustment)
        .await
        .map_err(into_status_error)?;

    record_loyalty_points(kind.label(), points);

    Ok(Json(adjustment.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use sorveteria::loyalty::LoyaltyError;
    use sorveteria_app::{
        auth::Principal,
        domain::{
            customers::records::CustomerUuid,
            loyalty::{LoyaltyServiceError, MockLoyaltyService},
        },
    };

    use crate::{
        loyalty::handlers::tests::{make_customer, make_transaction},
        test_helpers::{TEST_ADMIN, TEST_CUSTOMER, TestServices},
    };

    use super::*;

    fn make_service(loyalty: MockLoyaltyService) -> Service {
        make_service_as(loyalty, TEST_ADMIN)
    }

    fn make_service_as(loyalty: MockLoyaltyService, principal: Principal) -> Service {
        TestServices {
            loyalty,
            ..TestServices::default()
        }
        .serve(principal, Router::with_path("admin/loyalty").post(handler))
    }

    #[tokio::test]
    async fn test_earn_returns_new_balance() -> TestResult {
        let customer = CustomerUuid::new();
        let adjustment = LoyaltyAdjustment {
            customer: make_customer(customer, 60),
            transaction: make_transaction(customer, 50, PointsKind::Earn),
        };

        let mut loyalty = MockLoyaltyService::new();

        loyalty
            .expect_adjust_points()
            .once()
            .withf(move |uuid, adjustment| {
                *uuid == customer
                    && adjustment.delta() == 50
                    && adjustment.description() == Some("Aniversário")
            })
            .return_once(move |_, _| Ok(adjustment));

        let mut res = TestClient::post("http://example.com/admin/loyalty")
            .json(&json!({
                "customer_uuid": customer.into_uuid(),
                "points": 50,
                "type": "earn",
                "description": "Aniversário"
            }))
            .send(&make_service(loyalty))
            .await;

        let body: AdjustPointsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.customer.loyalty_points, 60);
        assert_eq!(body.transaction.points, 50);
        assert_eq!(body.transaction.kind, "earn");

        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_points_returns_400() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty.expect_adjust_points().once().return_once(|_, _| {
            Err(LoyaltyServiceError::Points(
                LoyaltyError::InsufficientPoints {
                    balance: 10,
                    requested: 30,
                },
            ))
        });

        let res = TestClient::post("http://example.com/admin/loyalty")
            .json(&json!({
                "customer_uuid": CustomerUuid::new().into_uuid(),
                "points": 30,
                "type": "redeem"
            }))
            .send(&make_service(loyalty))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_points_rejected_before_service() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty.expect_adjust_points().never();

        let res = TestClient::post("http://example.com/admin/loyalty")
            .json(&json!({
                "customer_uuid": CustomerUuid::new().into_uuid(),
                "points": 0,
                "type": "earn"
            }))
            .send(&make_service(loyalty))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_type_rejected_before_service() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty.expect_adjust_points().never();

        let res = TestClient::post("http://example.com/admin/loyalty")
            .json(&json!({
                "customer_uuid": CustomerUuid::new().into_uuid(),
                "points": 5,
                "type": "gift"
            }))
            .send(&make_service(loyalty))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_cannot_adjust_points() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty.expect_adjust_points().never();

        let res = TestClient::post("http://example.com/admin/loyalty")
            .json(&json!({
                "customer_uuid": CustomerUuid::new().into_uuid(),
                "points": 5,
                "type": "earn"
            }))
            .send(&make_service_as(loyalty, TEST_CUSTOMER))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
