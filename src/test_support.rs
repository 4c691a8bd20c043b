//! Shared fixtures for unit and router tests.

use crate::error::InferenceError;
use crate::model::predictor::{Predictor, ProbabilityEstimator};
use crate::preprocessing::features::{FeatureRecord, FeatureRow};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn example_body() -> Value {
    json!({
        "Pregnancies": 1,
        "Glucose": 120,
        "BloodPressure": 70,
        "SkinThickness": 30,
        "Insulin": 0,
        "BMI": 25.5,
        "DiabetesPedigreeFunction": 0.3,
        "Age": 22
    })
}

pub fn example_record() -> FeatureRecord {
    FeatureRecord::from_json(&example_body()).unwrap()
}

pub fn example_row() -> FeatureRow {
    example_record().to_row()
}

enum Behavior {
    Answer { label: i64, probability: Option<f64> },
    Fail(String),
    Panic,
}

/// Predictor that answers with canned values and counts its invocations.
pub struct SpyPredictor {
    behavior: Behavior,
    classify_calls: AtomicUsize,
    probability_calls: AtomicUsize,
}

impl SpyPredictor {
    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            classify_calls: AtomicUsize::new(0),
            probability_calls: AtomicUsize::new(0),
        }
    }

    /// `probability: None` means the model has no probability capability.
    pub fn new(label: i64, probability: Option<f64>) -> Self {
        Self::with(Behavior::Answer { label, probability })
    }

    pub fn failing(message: &str) -> Self {
        Self::with(Behavior::Fail(message.to_string()))
    }

    pub fn panicking() -> Self {
        Self::with(Behavior::Panic)
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn probability_calls(&self) -> usize {
        self.probability_calls.load(Ordering::SeqCst)
    }
}

impl Predictor for SpyPredictor {
    fn classify(&self, _row: &FeatureRow) -> Result<i64, InferenceError> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Answer { label, .. } => Ok(*label),
            Behavior::Fail(message) => Err(InferenceError::InvalidArtifact(message.clone())),
            Behavior::Panic => panic!("spy predictor panicked"),
        }
    }

    fn probability_estimator(&self) -> Option<&dyn ProbabilityEstimator> {
        match self.behavior {
            Behavior::Answer {
                probability: Some(_),
                ..
            } => Some(self),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        "spy".to_string()
    }
}

impl ProbabilityEstimator for SpyPredictor {
    fn positive_probability(&self, _row: &FeatureRow) -> Result<f64, InferenceError> {
        self.probability_calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Answer {
                probability: Some(p),
                ..
            } => Ok(p),
            _ => Err(InferenceError::Prediction("no probability".to_string())),
        }
    }
}
