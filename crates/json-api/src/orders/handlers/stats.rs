//! Order Dashboard Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use sorveteria::orders::OrderStatus;
use sorveteria_app::domain::orders::records::OrderStats;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::get::OrderResponse},
    state::State,
};

/// Status Count
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusCountResponse {
    /// Status label
    pub status: String,

    /// Orders currently in that status
    pub count: u64,
}

/// Order Stats Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderStatsResponse {
    /// Orders ever placed
    pub total_orders: u64,

    /// Sum of order totals in centavos
    pub revenue: u64,

    /// Orders per status, in lifecycle order
    pub by_status: Vec<StatusCountResponse>,

    /// Latest orders, newest first
    pub recent: Vec<OrderResponse>,
}

impl From<OrderStats> for OrderStatsResponse {
    fn from(stats: OrderStats) -> Self {
        Self {
            total_orders: stats.total_orders,
            revenue: stats.revenue.minor_units(),
            by_status: OrderStatus::ALL
                .into_iter()
                .map(|status| StatusCountResponse {
                    status: status.label().to_string(),
                    count: stats.by_status.get(&status).copied().unwrap_or_default(),
                })
                .collect(),
            recent: stats.recent.into_iter().map(Into::into).collect(),
        }
    }
}

/// Order Dashboard Handler
#[endpoint(
    tags("admin"),
    summary = "Order Dashboard",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrderStatsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let stats = state
        .app
        .orders
        .order_stats()
        .await
        .map_err(into_status_error)?;

    Ok(Json(stats.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use sorveteria::prices::Price;
    use sorveteria_app::domain::orders::{MockOrdersService, records::OrderUuid};

    use crate::{
        orders::handlers::tests::make_order,
        test_helpers::{TEST_ADMIN, TEST_CUSTOMER_UUID, TestServices},
    };

    use super::*;

    #[tokio::test]
    async fn test_stats_list_every_status() -> TestResult {
        let stats = OrderStats {
            total_orders: 3,
            revenue: Price::new(12_000),
            by_status: [(OrderStatus::Pending, 2), (OrderStatus::Delivered, 1)]
                .into_iter()
                .collect(),
            recent: vec![make_order(OrderUuid::new(), TEST_CUSTOMER_UUID)],
        };

        let mut orders = MockOrdersService::new();

        orders
            .expect_order_stats()
            .once()
            .return_once(move || Ok(stats));

        let service = TestServices {
            orders,
            ..TestServices::default()
        }
        .serve(
            TEST_ADMIN,
            Router::with_path("admin/orders/stats").get(handler),
        );

        let mut res = TestClient::get("http://example.com/admin/orders/stats")
            .send(&service)
            .await;

        let body: OrderStatsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.total_orders, 3);
        assert_eq!(body.revenue, 12_000);
        assert_eq!(body.by_status.len(), OrderStatus::ALL.len());

        let counts: Vec<(&str, u64)> = body
            .by_status
            .iter()
            .map(|entry| (entry.status.as_str(), entry.count))
            .collect();

        assert_eq!(
            counts,
            vec![
                ("Pendente", 2),
                ("Em preparo", 0),
                ("Saiu para a entrega", 0),
                ("Entregue", 1),
                ("Cancelado", 0),
            ]
        );
        assert_eq!(body.recent.len(), 1);

        Ok(())
    }
}
