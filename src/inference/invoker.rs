use crate::error::InferenceError;
use crate::model::predictor::Predictor;
use crate::preprocessing::features::FeatureRow;
use std::sync::Arc;
use tracing::error;

/// Normalized model output for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub label: u8,
    /// Probability of the positive class.
    pub probability: f64,
    /// False when the model has no probability capability and `probability`
    /// is just the label.
    pub calibrated: bool,
}

/// Classifies `row` and, when the model supports it, estimates the
/// positive-class probability. Every model failure comes back as
/// [`InferenceError::Prediction`].
pub fn invoke(model: &dyn Predictor, row: &FeatureRow) -> Result<Outcome, InferenceError> {
    let raw_label = model.classify(row).map_err(into_prediction_error)?;
    let label = match raw_label {
        0 => 0u8,
        1 => 1u8,
        other => {
            return Err(InferenceError::Prediction(format!(
                "model returned non-binary label {}",
                other
            )))
        }
    };

    let (probability, calibrated) = match model.probability_estimator() {
        Some(estimator) => {
            let p = estimator
                .positive_probability(row)
                .map_err(into_prediction_error)?;
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(InferenceError::Prediction(format!(
                    "model returned probability {} outside [0, 1]",
                    p
                )));
            }
            (p, true)
        }
        None => (f64::from(label), false),
    };

    Ok(Outcome {
        label,
        probability,
        calibrated,
    })
}

/// Runs [`invoke`] on the blocking pool. A panic inside the model is
/// reported as a prediction error and does not take the worker down.
pub async fn invoke_blocking(
    model: Arc<dyn Predictor>,
    row: FeatureRow,
) -> Result<Outcome, InferenceError> {
    let result = tokio::task::spawn_blocking(move || invoke(model.as_ref(), &row))
        .await
        .map_err(|e| {
            error!("Inference task failed: {}", e);
            InferenceError::Prediction("model invocation aborted".to_string())
        })?;

    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}

fn into_prediction_error(e: InferenceError) -> InferenceError {
    match e {
        InferenceError::Prediction(_) => e,
        other => InferenceError::Prediction(other.to_string()),
    }
}
