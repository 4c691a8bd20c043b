use crate::error::InferenceError;
use crate::model::predictor::{Predictor, ProbabilityEstimator};
use crate::preprocessing::features::{FeatureRow, FEATURE_NAMES};
use ndarray::ArrayView2;
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::{DynMapValueType, Tensor, ValueType};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// How the feature row is fed to the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputLayout {
    /// One `[1, n]` tensor holding the whole row in training order.
    Packed(String),
    /// One `[1, 1]` tensor per feature, matched by input name.
    PerFeature,
}

/// Shape of the graph's class-probability output.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ProbabilityLayout {
    /// `[N, 2]` tensor; column 1 is the positive class.
    Tensor,
    /// Sequence of `{class: probability}` maps, one per row (skl2onnx ZipMap).
    ZipMap,
}

#[derive(Debug, Clone)]
struct ProbabilityOutput {
    name: String,
    layout: ProbabilityLayout,
}

/// Classifier exported to ONNX and run through ONNX Runtime.
///
/// The first graph output is the label. A second output is read as class
/// probabilities when it is either an `[N, 2]` tensor or a ZipMap sequence of
/// maps; graphs without one have no probability capability.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    layout: InputLayout,
    label_output: String,
    probability_output: Option<ProbabilityOutput>,
}

impl OnnxClassifier {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_file(path)?;

        for (i, input) in session.inputs.iter().enumerate() {
            debug!("  Input {}: {} ({:?})", i, input.name, input.input_type);
        }
        for (i, output) in session.outputs.iter().enumerate() {
            debug!("  Output {}: {} ({:?})", i, output.name, output.output_type);
        }

        let layout = match session.inputs.as_slice() {
            [single] => InputLayout::Packed(single.name.clone()),
            inputs
                if inputs.len() == FEATURE_NAMES.len()
                    && FEATURE_NAMES
                        .iter()
                        .all(|name| inputs.iter().any(|input| input.name == *name)) =>
            {
                InputLayout::PerFeature
            }
            inputs => {
                return Err(InferenceError::InvalidArtifact(format!(
                    "graph inputs {:?} match neither a packed row nor the feature names",
                    inputs.iter().map(|i| i.name.as_str()).collect::<Vec<_>>()
                )))
            }
        };

        let label_output = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::InvalidArtifact("graph has no outputs".to_string()))?;

        let probability_output = session.outputs.get(1).and_then(|o| {
            let layout = match &o.output_type {
                ValueType::Tensor { .. } => ProbabilityLayout::Tensor,
                ValueType::Sequence(inner) if matches!(**inner, ValueType::Map { .. }) => {
                    ProbabilityLayout::ZipMap
                }
                _ => return None,
            };
            Some(ProbabilityOutput {
                name: o.name.clone(),
                layout,
            })
        });

        info!(
            "Loaded ONNX model {} (layout {:?}, probabilities: {:?})",
            path.display(),
            layout,
            probability_output.as_ref().map(|p| &p.layout)
        );

        Ok(Self {
            session: Mutex::new(session),
            layout,
            label_output,
            probability_output,
        })
    }

    fn inputs(&self, row: &FeatureRow) -> Result<Vec<(String, Tensor<f32>)>, InferenceError> {
        // Graphs take f32; saturate instead of overflowing to infinity.
        let narrow = |v: f64| v.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32;

        match &self.layout {
            InputLayout::Packed(name) => {
                let values: Vec<f32> = row.values().into_iter().map(narrow).collect();
                let shape = vec![1usize, values.len()];
                let tensor = Tensor::from_array((shape, values.into_boxed_slice()))?;
                Ok(vec![(name.clone(), tensor)])
            }
            InputLayout::PerFeature => row
                .names()
                .zip(row.values())
                .map(|(name, value)| -> Result<_, InferenceError> {
                    let tensor = Tensor::from_array((
                        vec![1usize, 1],
                        vec![narrow(value)].into_boxed_slice(),
                    ))?;
                    Ok((name.to_string(), tensor))
                })
                .collect(),
        }
    }

    // A panic inside `run` leaves no Rust-side state half-updated, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Predictor for OnnxClassifier {
    fn classify(&self, row: &FeatureRow) -> Result<i64, InferenceError> {
        let inputs = self.inputs(row)?;
        let mut session = self.lock();
        let outputs = session.run(inputs)?;
        let label = &outputs[self.label_output.as_str()];

        // Classifiers export int64 labels; regressors-as-classifiers export floats.
        if let Ok((_, data)) = label.try_extract_tensor::<i64>() {
            return data
                .first()
                .copied()
                .ok_or_else(|| InferenceError::Prediction("empty label tensor".to_string()));
        }
        let (_, data) = label.try_extract_tensor::<f32>()?;
        data.first()
            .map(|v| v.round() as i64)
            .ok_or_else(|| InferenceError::Prediction("empty label tensor".to_string()))
    }

    fn probability_estimator(&self) -> Option<&dyn ProbabilityEstimator> {
        self.probability_output.as_ref().map(|_| self as &dyn ProbabilityEstimator)
    }

    fn describe(&self) -> String {
        format!("ONNX classifier (label output {})", self.label_output)
    }
}

impl ProbabilityEstimator for OnnxClassifier {
    fn positive_probability(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let output = self.probability_output.as_ref().ok_or_else(|| {
            InferenceError::Prediction("model has no probability output".to_string())
        })?;

        let inputs = self.inputs(row)?;
        let mut session = self.lock();
        let outputs = session.run(inputs)?;

        match output.layout {
            ProbabilityLayout::Tensor => tensor_probability(&outputs, &output.name),
            ProbabilityLayout::ZipMap => zipmap_probability(&outputs, &output.name),
        }
    }
}

fn tensor_probability(outputs: &SessionOutputs<'_>, name: &str) -> Result<f64, InferenceError> {
    let (shape, data) = outputs[name].try_extract_tensor::<f32>()?;
    let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
    if dims.len() != 2 || dims[1] != 2 {
        return Err(InferenceError::Prediction(format!(
            "expected probabilities shaped [N, 2], got {:?}",
            dims
        )));
    }
    let probabilities = ArrayView2::from_shape((dims[0], dims[1]), data)?;
    probabilities
        .get((0, 1))
        .map(|&p| f64::from(p))
        .ok_or_else(|| InferenceError::Prediction("empty probability tensor".to_string()))
}

fn zipmap_probability(outputs: &SessionOutputs<'_>, name: &str) -> Result<f64, InferenceError> {
    let allocator = Allocator::default();
    let rows = outputs[name].try_extract_sequence::<DynMapValueType>(&allocator)?;
    let first = rows
        .first()
        .ok_or_else(|| InferenceError::Prediction("empty probability sequence".to_string()))?;
    let by_class = first.try_extract_map::<i64, f32>()?;
    by_class
        .get(&1)
        .map(|&p| f64::from(p))
        .ok_or_else(|| InferenceError::Prediction("probability map has no class 1".to_string()))
}
