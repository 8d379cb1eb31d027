//! Request-level logging, request IDs, and parent trace extraction.

mod request_id;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use sorveteria_app::auth::Principal;

use request_id::RequestId;

use super::{metrics, otel, settings};

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id = RequestId::from_header(
        req.headers()
            .get(request_id::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    );

    request_id.write_to(res);
    depot.inject(request_id.clone());

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let names = spans::request_span_name(&method, &path);
    let _in_flight_request = metrics::InFlightRequestGuard::track();
    let policy = settings::policy();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %names.otel_span_name,
        otel.kind = "server",
        request_id = %request_id.as_str(),
        method = %method,
        path = %path,
        remote_addr = %req.remote_addr(),
        customer_uuid = tracing::field::Empty,
        admin = tracing::field::Empty,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    if policy.adopt_remote_parent
        && let Some(parent) = otel::parent_context(req.headers())
        && let Err(source) = span.set_parent(parent)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    // Only present once the bearer middleware accepted the token.
    if let Ok(principal) = depot.obtain::<Principal>() {
        record_caller(&span, principal);
    }

    let duration = started.elapsed();
    let status = res.status_code.unwrap_or(StatusCode::OK);
    let duration_ms = duration.as_millis();
    let threshold_ms = policy.slow_request.as_millis();

    metrics::observe_request(
        &method,
        &names.otel_path,
        status.as_u16(),
        duration.as_secs_f64(),
    );

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        info!(status = status.as_u16(), duration_ms, "request.completed");

        if status.is_server_error() {
            error!(status = status.as_u16(), method = %method, path = %path, "server error response");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), method = %method, path = %path, "client error response");
        }

        if duration_ms > threshold_ms {
            warn!(
                method = %method,
                path = %path,
                duration_ms,
                threshold_ms,
                "slow request detected"
            );
        }
    });
}

fn record_caller(span: &Span, principal: &Principal) {
    span.record("customer_uuid", tracing::field::display(principal.customer));
    span.record("admin", principal.is_admin);
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[salvo::handler]
    async fn ok() -> &'static str {
        "ok"
    }

    fn make_service() -> Service {
        Service::new(
            Router::new()
                .hoop(request_logging)
                .push(Router::with_path("orders").get(ok)),
        )
    }

    #[tokio::test]
    async fn generates_request_id_when_missing() -> TestResult {
        let mut res = TestClient::get("http://example.com/orders")
            .send(&make_service())
            .await;

        let request_id = res
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(request_id.is_some_and(|id| !id.is_empty()), "expected request id header");
        assert_eq!(res.take_string().await?, "ok");

        Ok(())
    }

    #[tokio::test]
    async fn request_id_is_available_to_handlers() -> TestResult {
        #[salvo::handler]
        async fn echo_request_id(depot: &mut Depot) -> String {
            depot
                .obtain::<RequestId>()
                .map(|id| id.as_str().to_owned())
                .unwrap_or_default()
        }

        let service = Service::new(
            Router::new()
                .hoop(request_logging)
                .push(Router::with_path("orders").get(echo_request_id)),
        );

        let mut res = TestClient::get("http://example.com/orders")
            .add_header("x-request-id", "pedido-7", true)
            .send(&service)
            .await;

        assert_eq!(res.take_string().await?, "pedido-7");

        Ok(())
    }

    #[tokio::test]
    async fn echoes_incoming_request_id() {
        let res = TestClient::get("http://example.com/orders")
            .add_header("x-request-id", "pedido-42", true)
            .send(&make_service())
            .await;

        let request_id = res
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok());

        assert_eq!(request_id, Some("pedido-42"));
    }
}
