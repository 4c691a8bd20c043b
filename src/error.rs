use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ndarray::ShapeError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single rejected field in an inbound feature record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Invalid input: {}", describe_fields(.0))]
    InvalidInput(Vec<FieldError>),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Model not loaded. Please check server configuration.")]
    ModelUnavailable,

    #[error("Model not found at path: {0}")]
    ModelNotFound(String),

    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("ONNX Runtime error: {0}")]
    OrtError(#[from] ort::Error),

    #[error("Shape error: {0}")]
    ShapeError(#[from] ShapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prediction error: {0}")]
    Prediction(String),
}

fn describe_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", f.field, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl InferenceError {
    /// Stable classification string reported to clients and used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::InvalidInput(_) => "invalid_input",
            InferenceError::MalformedBody(_) => "malformed_body",
            InferenceError::ModelUnavailable => "model_unavailable",
            _ => "prediction_failed",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            InferenceError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            InferenceError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            InferenceError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for InferenceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            InferenceError::InvalidInput(fields) => json!({
                "error": self.to_string(),
                "kind": self.kind(),
                "fields": fields,
            }),
            _ => json!({
                "error": self.to_string(),
                "kind": self.kind(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
