//! App Router

use salvo::Router;

use crate::{auth, coupons, favorites, loyalty, orders};

/// Customer and admin routes; everything here requires a bearer token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(Router::with_path("coupons/validate").get(coupons::validate::handler))
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(
            Router::with_path("favorites")
                .get(favorites::index::handler)
                .post(favorites::create::handler)
                .push(Router::with_path("{favorite}").delete(favorites::delete::handler)),
        )
        .push(admin_router())
}

fn admin_router() -> Router {
    Router::with_path("admin")
        .hoop(auth::admin::handler)
        .push(
            Router::with_path("orders")
                .get(orders::admin_index::handler)
                .push(Router::with_path("stats").get(orders::stats::handler))
                .push(Router::with_path("{order}/status").patch(orders::status::handler)),
        )
        .push(
            Router::with_path("coupons")
                .get(coupons::index::handler)
                .post(coupons::upsert::handler)
                .push(Router::with_path("{code}").patch(coupons::toggle::handler)),
        )
        .push(
            Router::with_path("loyalty")
                .get(loyalty::index::handler)
                .post(loyalty::adjust::handler)
                .push(
                    Router::with_path("{customer}/transactions").get(loyalty::transactions::handler),
                ),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{affix_state::inject, http::header::AUTHORIZATION, prelude::*, test::TestClient};
    use testresult::TestResult;

    use sorveteria_app::{
        auth::{MockAuthService, Principal},
        domain::orders::{MockOrdersService, records::OrderUuid},
    };

    use crate::{
        orders::tests::make_order,
        test_helpers::{TEST_ADMIN, TEST_CUSTOMER, TEST_CUSTOMER_UUID, TestServices},
    };

    use super::*;

    fn auth_as(principal: Principal) -> MockAuthService {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .returning(move |_| Ok(principal));

        auth
    }

    #[tokio::test]
    async fn test_admin_routes_reject_customers() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let state = TestServices {
            auth: auth_as(TEST_CUSTOMER),
            orders,
            ..TestServices::default()
        }
        .into_state();

        let service = Service::new(
            Router::new()
                .hoop(inject(state))
                .push(app_router()),
        );

        let res = TestClient::get("http://example.com/admin/orders")
            .add_header(AUTHORIZATION, "Bearer token", true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_routes_allow_admins() -> TestResult {
        let order = make_order(OrderUuid::new(), TEST_CUSTOMER_UUID);

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .return_once(move |_| Ok(vec![order]));

        let state = TestServices {
            auth: auth_as(TEST_ADMIN),
            orders,
            ..TestServices::default()
        }
        .into_state();

        let service = Service::new(
            Router::new()
                .hoop(inject(state))
                .push(app_router()),
        );

        let res = TestClient::get("http://example.com/admin/orders")
            .add_header(AUTHORIZATION, "Bearer token", true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_routes_require_token() -> TestResult {
        let service = Service::new(
            Router::new()
                .hoop(inject(TestServices::default().into_state()))
                .push(app_router()),
        );

        let res = TestClient::get("http://example.com/orders")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
