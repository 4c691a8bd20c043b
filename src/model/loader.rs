use crate::error::InferenceError;
use crate::model::linear::LinearClassifier;
use crate::model::onnx::OnnxClassifier;
use crate::model::predictor::Predictor;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

// Initialize the global environment for ORT (only needed once)
pub fn init_ort() -> Result<(), InferenceError> {
    ort::init().with_name("diabetes-api").commit()?;
    Ok(())
}

/// Loads the classifier artifact at `model_path`.
///
/// The format is chosen by extension: `.onnx` graphs run through ONNX
/// Runtime, `.json` files hold exported linear-model coefficients.
pub fn load_model(model_path: impl AsRef<Path>) -> Result<Arc<dyn Predictor>, InferenceError> {
    let path = model_path.as_ref();
    if !path.exists() {
        return Err(InferenceError::ModelNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let model: Arc<dyn Predictor> = match extension.as_deref() {
        Some("onnx") => {
            init_ort()?;
            Arc::new(OnnxClassifier::from_file(path)?)
        }
        Some("json") => Arc::new(LinearClassifier::from_file(path)?),
        _ => return Err(InferenceError::UnsupportedFormat(path.display().to_string())),
    };

    info!("Loaded model {}: {}", path.display(), model.describe());
    Ok(model)
}

/// Loads the model, degrading to `None` instead of failing so the service
/// stays reachable for health checks.
pub fn load_or_degrade(model_path: impl AsRef<Path>) -> Option<Arc<dyn Predictor>> {
    let path = model_path.as_ref();
    match load_model(path) {
        Ok(model) => Some(model),
        Err(e) => {
            warn!(
                "Model could not be loaded from {} ({}); predictions are disabled",
                path.display(),
                e
            );
            None
        }
    }
}
