//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use sorveteria::{coupons::CouponCode, orders::CheckoutRequest};

use crate::{
    extensions::*,
    observability::record_order_placed,
    orders::{errors::into_status_error, handlers::get::OrderResponse},
    pots::{PotRequest, resolve_pots},
    state::State,
};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    /// Pots to order
    pub pots: Vec<PotRequest>,

    /// Coupon to apply; blank means none
    #[serde(default)]
    pub coupon_code: Option<String>,

    /// How the customer pays
    pub payment_method: String,

    /// Where to deliver
    pub delivery_address: String,
}

/// Create Order Handler
///
/// Prices the submitted pots, applies the coupon if one is given and stores
/// the order for the calling customer.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.create", skip(json, depot, res), err)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let request = json.into_inner();

    let coupon_code = request
        .coupon_code
        .filter(|code| !code.trim().is_empty())
        .map(|code| CouponCode::parse(&code))
        .transpose()
        .or_400("Invalid coupon code")?;

    let pots = resolve_pots(state.app.catalog.as_ref(), &request.pots).await?;

    let order = state
        .app
        .orders
        .create_order(
            principal.customer,
            CheckoutRequest {
                pots,
                coupon_code,
                payment_method: request.payment_method,
                delivery_address: request.delivery_address,
            },
        )
        .await
        .map_err(into_status_error)?;

    record_order_placed(order.total.minor_units(), order.coupon_code.is_some());

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use uuid::Uuid;

    use sorveteria::{coupons::CouponError, orders::AssemblyError};
    use sorveteria_app::domain::{
        catalog::MockCatalogService,
        orders::{MockOrdersService, OrdersServiceError, records::OrderUuid},
    };

    use crate::{
        orders::handlers::tests::make_order,
        pots::tests::flavor_record,
        test_helpers::{TEST_CUSTOMER, TEST_CUSTOMER_UUID, TestServices},
    };

    use super::*;

    fn make_service(catalog: MockCatalogService, orders: MockOrdersService) -> Service {
        TestServices {
            catalog,
            orders,
            ..TestServices::default()
        }
        .serve(TEST_CUSTOMER, Router::with_path("orders").post(handler))
    }

    fn catalog_with(flavor: Uuid) -> MockCatalogService {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_flavors()
            .once()
            .return_once(move |_| Ok(vec![flavor_record(flavor, "Açaí")]));

        catalog
    }

    #[tokio::test]
    async fn test_create_order_returns_201_with_location() -> TestResult {
        let flavor = Uuid::now_v7();
        let uuid = OrderUuid::new();
        let order = make_order(uuid, TEST_CUSTOMER_UUID);

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(move |customer, request| {
                *customer == TEST_CUSTOMER_UUID
                    && request.pots.len() == 1
                    && request.coupon_code.as_ref().map(CouponCode::as_str) == Some("VERAO10")
                    && request.payment_method == "pix"
            })
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "pots": [{ "size": "grande", "flavors": [flavor] }],
                "coupon_code": " verao10 ",
                "payment_method": "pix",
                "delivery_address": "Rua das Flores, 10"
            }))
            .send(&make_service(catalog_with(flavor), orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            res.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some(format!("/orders/{uuid}").as_str())
        );
        assert_eq!(body.total, 4_500);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_blank_coupon_means_none() -> TestResult {
        let flavor = Uuid::now_v7();
        let order = make_order(OrderUuid::new(), TEST_CUSTOMER_UUID);

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|_, request| request.coupon_code.is_none())
            .return_once(move |_, _| Ok(order));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "pots": [{ "size": "pequeno", "flavors": [flavor] }],
                "coupon_code": "  ",
                "payment_method": "dinheiro",
                "delivery_address": "Rua B, 2"
            }))
            .send(&make_service(catalog_with(flavor), orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_unknown_coupon_returns_404() -> TestResult {
        let flavor = Uuid::now_v7();

        let mut orders = MockOrdersService::new();

        orders.expect_create_order().once().return_once(|_, _| {
            Err(OrdersServiceError::Assembly(AssemblyError::Coupon(
                CouponError::NotFound,
            )))
        });

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "pots": [{ "size": "medio", "flavors": [flavor] }],
                "coupon_code": "FANTASMA",
                "payment_method": "pix",
                "delivery_address": "Rua C, 3"
            }))
            .send(&make_service(catalog_with(flavor), orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_without_pots_returns_400() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog.expect_get_flavors().never();

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|_, request| request.pots.is_empty())
            .return_once(|_, _| Err(OrdersServiceError::Assembly(AssemblyError::EmptyPots)));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "pots": [],
                "payment_method": "pix",
                "delivery_address": "Rua D, 4"
            }))
            .send(&make_service(catalog, orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_unknown_size_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "pots": [{ "size": "familia" }],
                "payment_method": "pix",
                "delivery_address": "Rua E, 5"
            }))
            .send(&make_service(MockCatalogService::new(), orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
