pub mod formatter;
pub mod invoker;

pub use formatter::PredictionResult;
pub use invoker::{invoke, Outcome};
