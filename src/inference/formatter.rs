use crate::inference::invoker::Outcome;
use crate::preprocessing::features::FeatureRecord;
use serde::Serialize;

pub const POSITIVE_MESSAGE: &str =
    "The model predicts that the patient is likely to have diabetes.";
pub const NEGATIVE_MESSAGE: &str =
    "The model predicts that the patient is likely not to have diabetes.";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub prediction: u8,
    pub probability: f64,
    pub message: String,
    pub input_data: FeatureRecord,
    pub calibrated: bool,
}

pub fn message_for(label: u8) -> &'static str {
    if label == 1 {
        POSITIVE_MESSAGE
    } else {
        NEGATIVE_MESSAGE
    }
}

impl PredictionResult {
    pub fn new(outcome: Outcome, input_data: FeatureRecord) -> Self {
        Self {
            prediction: outcome.label,
            probability: outcome.probability,
            message: message_for(outcome.label).to_string(),
            input_data,
            calibrated: outcome.calibrated,
        }
    }
}
