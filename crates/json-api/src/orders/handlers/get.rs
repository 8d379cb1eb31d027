//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sorveteria_app::domain::orders::records::OrderRecord;

use crate::{
    extensions::*,
    orders::errors::into_status_error,
    pots::{CatalogRefResponse, refs_response},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// The customer who placed the order
    pub customer_uuid: Uuid,

    /// Pot sizes, in pot order
    pub size_label: String,

    /// Distinct flavors across all pots
    pub flavors: Vec<CatalogRefResponse>,

    /// Distinct additionals across all pots
    pub additionals: Vec<CatalogRefResponse>,

    /// Sum of pot prices in centavos
    pub subtotal: u64,

    /// Coupon discount in centavos
    pub discount: u64,

    /// Amount charged in centavos
    pub total: u64,

    /// Coupon used, if any
    pub coupon_code: Option<String>,

    /// How the customer pays
    pub payment_method: String,

    /// Where the order goes
    pub delivery_address: String,

    /// Current status label
    pub status: String,

    /// The date and time the order was placed
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            customer_uuid: order.customer_uuid.into_uuid(),
            size_label: order.size_label,
            flavors: refs_response(&order.flavors),
            additionals: refs_response(&order.additionals),
            subtotal: order.subtotal.minor_units(),
            discount: order.discount.minor_units(),
            total: order.total.minor_units(),
            coupon_code: order.coupon_code.map(String::from),
            payment_method: order.payment_method,
            delivery_address: order.delivery_address,
            status: order.status.label().to_string(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Get Order Handler
///
/// Returns one of the caller's orders.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let order = state
        .app
        .orders
        .get_order(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    // Other customers' orders are indistinguishable from missing ones.
    if order.customer_uuid != principal.customer && !principal.is_admin {
        return Err(StatusError::not_found().brief("Order not found"));
    }

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use sorveteria_app::domain::{
        customers::records::CustomerUuid,
        orders::{MockOrdersService, OrdersServiceError, records::OrderUuid},
    };

    use crate::{
        orders::handlers::tests::make_order,
        test_helpers::{TEST_CUSTOMER, TEST_CUSTOMER_UUID, TestServices},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        TestServices {
            orders,
            ..TestServices::default()
        }
        .serve(TEST_CUSTOMER, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_get_own_order_returns_200() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid, TEST_CUSTOMER_UUID);

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(move |_| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.status, "Pendente");
        assert_eq!(body.flavors.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_other_customers_order_returns_404() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid, CustomerUuid::new());

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(order));

        let res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_invalid_uuid_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_get_order().never();

        let res = TestClient::get("http://example.com/orders/123")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
