pub mod handle;
pub mod linear;
pub mod loader;
pub mod onnx;
pub mod predictor;

pub use handle::ModelHandle;
pub use predictor::{Predictor, ProbabilityEstimator};
