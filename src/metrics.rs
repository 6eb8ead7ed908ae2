//! Prometheus HTTP metrics: request duration, request and error counts, and
//! rejected-for-rate requests, labelled by method, matched route and status.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use prometheus::{
    HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TEXT_FORMAT, TextEncoder,
};

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

const REQUEST_LABELS: &[&str] = &["method", "url", "status_code"];
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Clone)]
pub struct HttpMetrics {
    registry: Registry,
    request_duration: HistogramVec,
    requests_total: IntCounterVec,
    errors_total: IntCounterVec,
    rate_limited_total: IntCounterVec,
}

impl HttpMetrics {
    /// Creates the collectors on a registry owned by this instance.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Duration of HTTP requests in seconds",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            REQUEST_LABELS,
        )?;
        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            REQUEST_LABELS,
        )?;
        let errors_total = IntCounterVec::new(
            Opts::new(
                "http_errors_total",
                "Total number of HTTP errors (status >= 400)",
            ),
            REQUEST_LABELS,
        )?;
        let rate_limited_total = IntCounterVec::new(
            Opts::new(
                "http_rate_limited_total",
                "Total number of requests answered with 429",
            ),
            &["method", "url"],
        )?;

        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(errors_total.clone()))?;
        registry.register(Box::new(rate_limited_total.clone()))?;

        Ok(Self {
            registry,
            request_duration,
            requests_total,
            errors_total,
            rate_limited_total,
        })
    }

    pub fn observe(&self, method: &str, route: &str, status: StatusCode, seconds: f64) {
        let code = status.as_str();
        let labels = [method, route, code];

        self.request_duration
            .with_label_values(&labels[..])
            .observe(seconds);
        self.requests_total.with_label_values(&labels[..]).inc();

        if status.is_client_error() || status.is_server_error() {
            self.errors_total.with_label_values(&labels[..]).inc();
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            self.rate_limited_total
                .with_label_values(&[method, route])
                .inc();
        }
    }

    /// Text exposition of every collector.
    pub fn render(&self) -> AppResult<String> {
        TextEncoder::new()
            .encode_to_string(&self.registry.gather())
            .map_err(|err| AppError::Internal(err.into()))
    }
}

/// Middleware recording one observation per request. The route label is the
/// matched route template, so ids in the path do not multiply series.
pub async fn track(
    State(metrics): State<HttpMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let started = Instant::now();
    let response = next.run(request).await;
    metrics.observe(
        &method,
        &route,
        response.status(),
        started.elapsed().as_secs_f64(),
    );

    response
}

#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Prometheus text exposition", content_type = "text/plain"),
    ),
    tag = "Health"
)]
pub async fn metrics_handler(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, TEXT_FORMAT)], body))
}
