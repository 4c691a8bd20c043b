use crate::model::ModelHandle;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

/// Shared Application State
#[derive(Clone)]
pub struct AppState {
    pub model: ModelHandle,
    pub metrics: PrometheusHandle,
}

// --- DTOs (Data Transfer Objects) ---

#[derive(Serialize, Debug)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Serialize, Debug)]
pub struct Endpoints {
    pub predict: &'static str,
    pub health: &'static str,
    pub metrics: &'static str,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}
