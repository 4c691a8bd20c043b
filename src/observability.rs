use crate::error::InferenceError;
use crate::inference::PredictionResult;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Installs the Prometheus recorder and returns the handle `/metrics` renders from.
pub fn install_metrics_recorder() -> anyhow::Result<PrometheusHandle> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

/// Records the outcome of one `/predict` call.
pub fn record_prediction(result: &Result<PredictionResult, InferenceError>, elapsed: Duration) {
    match result {
        Ok(prediction) => {
            counter!("predictions_total", "outcome" => "success").increment(1);
            counter!("prediction_label_total", "label" => prediction.prediction.to_string())
                .increment(1);
            histogram!("prediction_latency_seconds").record(elapsed.as_secs_f64());
        }
        Err(e) => {
            counter!("predictions_total", "outcome" => e.kind()).increment(1);
            if matches!(
                e,
                InferenceError::InvalidInput(_) | InferenceError::MalformedBody(_)
            ) {
                counter!("prediction_rejections_total", "kind" => e.kind()).increment(1);
            }
        }
    }
}
