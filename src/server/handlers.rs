use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::error::InferenceError;
use crate::inference::{invoker::invoke_blocking, PredictionResult};
use crate::observability;
use crate::preprocessing::features::FeatureRecord;
use crate::server::types::*;

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Diabetes Prediction API is running",
        status: "healthy",
        endpoints: Endpoints {
            predict: "/predict",
            health: "/health",
            metrics: "/metrics",
        },
    })
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.model.is_loaded(),
    })
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResult>, InferenceError> {
    let start = Instant::now();
    let result = run_prediction(&state, payload).await;
    observability::record_prediction(&result, start.elapsed());
    result.map(Json)
}

async fn run_prediction(
    state: &AppState,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<PredictionResult, InferenceError> {
    // An absent model wins over bad input: the client cannot fix it.
    let model = state.model.get().ok_or(InferenceError::ModelUnavailable)?;

    let Json(body) = payload.map_err(|e| InferenceError::MalformedBody(e.body_text()))?;
    let record = FeatureRecord::from_json(&body)?;

    let outcome = invoke_blocking(model, record.to_row()).await?;
    Ok(PredictionResult::new(outcome, record))
}
