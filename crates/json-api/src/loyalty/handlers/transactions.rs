//! Customer Ledger Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    loyalty::{errors::into_status_error, handlers::LoyaltyTransactionResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoyaltyTransactionsResponse {
    pub transactions: Vec<LoyaltyTransactionResponse>,
}

/// Customer Ledger Handler
///
/// Every points movement for one customer, newest first.
#[endpoint(
    tags("admin"),
    summary = "List Customer Loyalty Transactions",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    customer: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<LoyaltyTransactionsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let transactions = state
        .app
        .loyalty
        .customer_transactions(customer.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(LoyaltyTransactionsResponse {
        transactions: transactions.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use sorveteria::loyalty::PointsKind;
    use sorveteria_app::domain::{
        customers::records::CustomerUuid,
        loyalty::{LoyaltyServiceError, MockLoyaltyService},
    };

    use crate::{
        loyalty::handlers::tests::make_transaction,
        test_helpers::{TEST_ADMIN, TestServices},
    };

    use super::*;

    fn make_service(loyalty: MockLoyaltyService) -> Service {
        TestServices {
            loyalty,
            ..TestServices::default()
        }
        .serve(
            TEST_ADMIN,
            Router::with_path("admin/loyalty/{customer}/transactions").get(handler),
        )
    }

    #[tokio::test]
    async fn test_ledger_returns_signed_points() -> TestResult {
        let customer = CustomerUuid::new();
        let ledger = vec![
            make_transaction(customer, -20, PointsKind::Redeem),
            make_transaction(customer, 50, PointsKind::Earn),
        ];

        let mut loyalty = MockLoyaltyService::new();

        loyalty
            .expect_customer_transactions()
            .once()
            .withf(move |uuid| *uuid == customer)
            .return_once(move |_| Ok(ledger));

        let mut res = TestClient::get(format!(
            "http://example.com/admin/loyalty/{customer}/transactions"
        ))
        .send(&make_service(loyalty))
        .await;

        let body: LoyaltyTransactionsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let points: Vec<i64> = body.transactions.iter().map(|t| t.points).collect();

        assert_eq!(points, vec![-20, 50]);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_customer_returns_404() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty
            .expect_customer_transactions()
            .once()
            .return_once(|_| Err(LoyaltyServiceError::NotFound));

        let res = TestClient::get(format!(
            "http://example.com/admin/loyalty/{}/transactions",
            CustomerUuid::new()
        ))
        .send(&make_service(loyalty))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
