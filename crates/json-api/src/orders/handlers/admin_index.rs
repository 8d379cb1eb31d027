//! All Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::index::OrdersResponse},
    state::State,
};

/// All Orders Handler
#[endpoint(
    tags("admin"),
    summary = "List All Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let orders = state
        .app
        .orders
        .list_orders(None)
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

    use sorveteria_app::{
        auth::Principal,
        domain::{
            customers::records::CustomerUuid,
            orders::{MockOrdersService, records::OrderUuid},
        },
    };

    use crate::{
        orders::handlers::tests::make_order,
        test_helpers::{TEST_ADMIN, TEST_CUSTOMER, TestServices},
    };

    use super::*;

    fn make_service(orders: MockOrdersService, principal: Principal) -> Service {
        TestServices {
            orders,
            ..TestServices::default()
        }
        .serve(principal, Router::with_path("admin/orders").get(handler))
    }

    #[tokio::test]
    async fn test_admin_sees_every_customer() -> TestResult {
        let first = make_order(OrderUuid::new(), CustomerUuid::new());
        let second = make_order(OrderUuid::new(), CustomerUuid::new());

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(Option::is_none)
            .return_once(move |_| Ok(vec![first, second]));

        let mut res = TestClient::get("http://example.com/admin/orders")
            .send(&make_service(orders, TEST_ADMIN))
            .await;

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.orders.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_is_forbidden() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/admin/orders")
            .send(&make_service(orders, TEST_CUSTOMER))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
