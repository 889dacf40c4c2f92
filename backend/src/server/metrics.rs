//! Prometheus request metrics served on `/metrics`.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

const NAMESPACE: &str = "yamdb";
const ENDPOINT: &str = "/metrics";

/// Build the request metrics middleware.
///
/// Liveness and readiness probes are excluded so orchestrator polling does
/// not dominate the histograms.
///
/// # Errors
/// Returns [`std::io::Error`] if the collectors cannot be registered.
pub(crate) fn build_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(NAMESPACE)
        .endpoint(ENDPOINT)
        .exclude("/health/live")
        .exclude("/health/ready")
        .build()
        .map_err(|err| std::io::Error::other(format!("metrics registration failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn exposes_metrics_endpoint() {
        let metrics = build_metrics().expect("metrics build");
        let app = test::init_service(
            App::new()
                .wrap(metrics)
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let _ = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri(ENDPOINT).to_request()).await;
        assert!(res.status().is_success());
        let body = test::read_body(res).await;
        let text = std::str::from_utf8(&body).expect("utf8");
        assert!(text.contains("yamdb_http_requests_total"));
    }
}
