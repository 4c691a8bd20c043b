use crate::error::InferenceError;
use crate::model::predictor::{Predictor, ProbabilityEstimator};
use crate::preprocessing::features::{FeatureRow, FEATURE_NAMES};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LinearKind {
    /// Logistic regression; estimates probability through the sigmoid.
    LogisticRegression,
    /// Linear SVM; produces labels only.
    LinearSvc,
}

/// Exported coefficients of a linear classifier.
#[derive(Deserialize, Clone, Debug)]
pub struct LinearClassifier {
    pub kind: LinearKind,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearClassifier {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let content = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&content)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), InferenceError> {
        if self.feature_names != FEATURE_NAMES {
            return Err(InferenceError::InvalidArtifact(format!(
                "feature names {:?} do not match expected {:?}",
                self.feature_names, FEATURE_NAMES
            )));
        }
        if self.coefficients.len() != self.feature_names.len() {
            return Err(InferenceError::InvalidArtifact(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.feature_names.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InferenceError::InvalidArtifact(
                "non-finite coefficient".to_string(),
            ));
        }
        Ok(())
    }

    /// Signed distance from the decision boundary.
    fn decision_function(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        self.feature_names
            .iter()
            .zip(&self.coefficients)
            .try_fold(self.intercept, |acc, (name, coef)| -> Result<f64, InferenceError> {
                let x = row.get(name).ok_or_else(|| {
                    InferenceError::Prediction(format!("row is missing feature {}", name))
                })?;
                Ok(acc + coef * x)
            })
    }
}

impl Predictor for LinearClassifier {
    fn classify(&self, row: &FeatureRow) -> Result<i64, InferenceError> {
        Ok(i64::from(self.decision_function(row)? > 0.0))
    }

    fn probability_estimator(&self) -> Option<&dyn ProbabilityEstimator> {
        match self.kind {
            LinearKind::LogisticRegression => Some(self),
            LinearKind::LinearSvc => None,
        }
    }

    fn describe(&self) -> String {
        format!("{:?} over {} features", self.kind, self.coefficients.len())
    }
}

impl ProbabilityEstimator for LinearClassifier {
    fn positive_probability(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let score = self.decision_function(row)?;
        Ok(1.0 / (1.0 + (-score).exp()))
    }
}
