use crate::error::InferenceError;
use crate::preprocessing::features::FeatureRow;

/// A trained binary classifier.
///
/// Classification is mandatory. Probability estimation is an optional
/// capability: implementations that can estimate it return `Some` from
/// [`Predictor::probability_estimator`], and callers branch on that rather
/// than attempting the call and handling a failure.
pub trait Predictor: Send + Sync {
    /// Returns the raw class label produced by the model.
    fn classify(&self, row: &FeatureRow) -> Result<i64, InferenceError>;

    fn probability_estimator(&self) -> Option<&dyn ProbabilityEstimator> {
        None
    }

    /// Short human-readable description used in startup logs.
    fn describe(&self) -> String;
}

pub trait ProbabilityEstimator: Send + Sync {
    /// Probability of the positive class (label 1).
    fn positive_probability(&self, row: &FeatureRow) -> Result<f64, InferenceError>;
}
