use crate::model::ModelHandle;
use crate::server::{handlers, types::AppState};
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub fn create_router(
    model: ModelHandle,
    metrics_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router {
    let state = Arc::new(AppState {
        model,
        metrics: metrics_handle,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/predict", post(handlers::predict))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
