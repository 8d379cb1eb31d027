//! Prometheus metrics: HTTP traffic plus shop counters, and the scrape endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const LATENCY_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_placed_total: IntCounterVec,
    order_revenue_centavos_total: IntCounter,
    coupon_validations_total: IntCounterVec,
    loyalty_points_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let Some(metrics) = metrics() else {
            return Self { tracked: false };
        };

        metrics.requests_in_flight.inc();

        Self { tracked: true }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code_label = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[
            method,
            route,
            status_class(status_code),
            status_code_label.as_str(),
        ])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Counts a stored order and adds its total to revenue.
pub(crate) fn record_order_placed(total_centavos: u64, with_coupon: bool) {
    let Some(metrics) = metrics() else {
        return;
    };

    let coupon = if with_coupon { "applied" } else { "none" };

    metrics
        .orders_placed_total
        .with_label_values(&[coupon])
        .inc();
    metrics.order_revenue_centavos_total.inc_by(total_centavos);
}

/// Counts a coupon validation by outcome (`accepted`, `expired`, ...).
pub(crate) fn record_coupon_validation(outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .coupon_validations_total
            .with_label_values(&[outcome])
            .inc();
    }
}

/// Adds points moved by an adjustment, labelled `earn` or `redeem`.
pub(crate) fn record_loyalty_points(kind: &str, points: u32) {
    if let Some(metrics) = metrics() {
        metrics
            .loyalty_points_total
            .with_label_values(&[kind])
            .inc_by(u64::from(points));
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn metrics() -> Option<&'static Metrics> {
    METRICS.get_or_init(build_metrics).as_ref()
}

/// Creates `metric` and adds it to `registry`, logging whichever step fails.
fn register<M>(
    registry: &Registry,
    name: &str,
    metric: Result<M, prometheus::Error>,
) -> Option<M>
where
    M: Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(source) => {
            error!("failed to create {name} metric: {source}");
            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(metric.clone())) {
        error!("failed to register {name} metric: {source}");
        return None;
    }

    Some(metric)
}

fn build_metrics() -> Option<Metrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        "requests_total",
        IntCounterVec::new(
            Opts::new(
                "sorveteria_json_http_requests_total",
                "HTTP requests by method, route, status class and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        ),
    )?;

    let request_duration_seconds = register(
        &registry,
        "request_duration_seconds",
        HistogramVec::new(
            HistogramOpts::new(
                "sorveteria_json_http_request_duration_seconds",
                "HTTP request duration in seconds by method and route.",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["method", "route"],
        ),
    )?;

    let requests_in_flight = register(
        &registry,
        "requests_in_flight",
        IntGauge::with_opts(Opts::new(
            "sorveteria_json_http_requests_in_flight",
            "HTTP requests currently being served.",
        )),
    )?;

    let orders_placed_total = register(
        &registry,
        "orders_placed_total",
        IntCounterVec::new(
            Opts::new(
                "sorveteria_json_orders_placed_total",
                "Orders stored, by whether a coupon was applied.",
            ),
            &["coupon"],
        ),
    )?;

    let order_revenue_centavos_total = register(
        &registry,
        "order_revenue_centavos_total",
        IntCounter::with_opts(Opts::new(
            "sorveteria_json_order_revenue_centavos_total",
            "Sum of stored order totals in centavos.",
        )),
    )?;

    let coupon_validations_total = register(
        &registry,
        "coupon_validations_total",
        IntCounterVec::new(
            Opts::new(
                "sorveteria_json_coupon_validations_total",
                "Coupon validation requests by outcome.",
            ),
            &["outcome"],
        ),
    )?;

    let loyalty_points_total = register(
        &registry,
        "loyalty_points_total",
        IntCounterVec::new(
            Opts::new(
                "sorveteria_json_loyalty_points_total",
                "Loyalty points moved, by adjustment type.",
            ),
            &["type"],
        ),
    )?;

    Some(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_placed_total,
        order_revenue_centavos_total,
        coupon_validations_total,
        loyalty_points_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    async fn scrape() -> TestResult<String> {
        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        let body = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        Ok(body)
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_metrics() -> TestResult {
        observe_request("GET", "/orders", 200, 0.042);
        observe_request("POST", "/orders", 500, 0.123);

        let body = scrape().await?;

        assert!(
            body.contains("sorveteria_json_http_requests_total"),
            "expected requests_total metric in response"
        );
        assert!(
            body.contains("sorveteria_json_http_request_duration_seconds"),
            "expected request_duration metric in response"
        );
        assert!(
            body.contains("sorveteria_json_http_requests_in_flight"),
            "expected in-flight metric in response"
        );

        Ok(())
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_shop_counters() -> TestResult {
        record_order_placed(9_000, true);
        record_coupon_validation("expired");
        record_loyalty_points("earn", 50);

        let body = scrape().await?;

        assert!(
            body.contains(r#"sorveteria_json_orders_placed_total{coupon="applied"}"#),
            "expected orders_placed metric in response"
        );
        assert!(
            body.contains("sorveteria_json_order_revenue_centavos_total"),
            "expected revenue metric in response"
        );
        assert!(
            body.contains(r#"sorveteria_json_coupon_validations_total{outcome="expired"}"#),
            "expected coupon validation metric in response"
        );
        assert!(
            body.contains(r#"sorveteria_json_loyalty_points_total{type="earn"}"#),
            "expected loyalty points metric in response"
        );

        Ok(())
    }

    #[test]
    fn status_classes_bucket_codes() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(404), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(42), "other");
    }
}
