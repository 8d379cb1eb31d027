//! Order History Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::get::OrderResponse},
    state::State,
};

/// Orders Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// Orders, newest first
    pub orders: Vec<OrderResponse>,
}

/// Order History Handler
///
/// Lists the calling customer's orders.
#[endpoint(
    tags("orders"),
    summary = "List My Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(Some(principal.customer))
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use sorveteria_app::domain::orders::{MockOrdersService, records::OrderUuid};

    use crate::{
        orders::handlers::tests::make_order,
        test_helpers::{TEST_CUSTOMER, TEST_CUSTOMER_UUID, TestServices},
    };

    use super::*;

    #[tokio::test]
    async fn test_lists_only_callers_orders() -> TestResult {
        let order = make_order(OrderUuid::new(), TEST_CUSTOMER_UUID);

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|customer| *customer == Some(TEST_CUSTOMER_UUID))
            .return_once(move |_| Ok(vec![order]));

        let service = TestServices {
            orders,
            ..TestServices::default()
        }
        .serve(TEST_CUSTOMER, Router::with_path("orders").get(handler));

        let mut res = TestClient::get("http://example.com/orders")
            .send(&service)
            .await;

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.orders.len(), 1);

        Ok(())
    }
}
