mod common;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::get,
};
use food_order_api::metrics::{self, HttpMetrics};
use tower::ServiceExt;

fn app(metrics: &HttpMetrics) -> Router {
    Router::new()
        .route("/api/orders/{id}", get(|| async { "order" }))
        .route(
            "/api/limited",
            get(|| async { StatusCode::TOO_MANY_REQUESTS }),
        )
        .layer(middleware::from_fn_with_state(metrics.clone(), metrics::track))
}

async fn call(app: Router, uri: &str) -> anyhow::Result<StatusCode> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    Ok(app.oneshot(request).await?.status())
}

fn series<'a>(text: &'a str, name: &str) -> Vec<&'a str> {
    let prefix = format!("{name}{{");
    text.lines().filter(|line| line.starts_with(&prefix)).collect()
}

#[tokio::test]
async fn requests_are_counted_per_route_template() -> anyhow::Result<()> {
    let metrics = HttpMetrics::new()?;

    assert_eq!(call(app(&metrics), "/api/orders/1").await?, StatusCode::OK);
    assert_eq!(call(app(&metrics), "/api/orders/2").await?, StatusCode::OK);
    assert_eq!(call(app(&metrics), "/nowhere").await?, StatusCode::NOT_FOUND);
    assert_eq!(
        call(app(&metrics), "/api/limited").await?,
        StatusCode::TOO_MANY_REQUESTS
    );

    let text = metrics.render()?;

    let requests = series(&text, "http_requests_total");
    let order_line = requests
        .iter()
        .find(|line| line.contains(r#"url="/api/orders/{id}""#))
        .expect("order route series");
    assert!(order_line.contains(r#"status_code="200""#));
    assert!(order_line.ends_with(" 2"));
    assert_eq!(requests.len(), 3);

    let errors = series(&text, "http_errors_total");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|line| !line.contains(r#"status_code="200""#)));

    let limited = series(&text, "http_rate_limited_total");
    assert_eq!(limited.len(), 1);
    assert!(limited[0].contains(r#"url="/api/limited""#));

    assert!(text.contains("http_request_duration_seconds_bucket{"));
    Ok(())
}

#[test]
fn metrics_render_empty_before_any_request() -> anyhow::Result<()> {
    let metrics = HttpMetrics::new()?;
    let text = metrics.render()?;
    assert!(series(&text, "http_requests_total").is_empty());
    Ok(())
}

#[tokio::test]
async fn metrics_endpoint_serves_text_exposition() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    state.metrics.observe("GET", "/health", StatusCode::OK, 0.002);

    let response = metrics::metrics_handler(State(state)).await?.into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/plain"));
    Ok(())
}
