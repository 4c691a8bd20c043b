use crate::model::predictor::Predictor;
use std::sync::Arc;

/// The process-wide model reference.
///
/// Set once when the server starts and read-only afterwards, so clones share
/// the same predictor without any locking. An absent model means the service
/// runs in degraded mode.
#[derive(Clone, Default)]
pub struct ModelHandle {
    model: Option<Arc<dyn Predictor>>,
}

impl ModelHandle {
    pub fn new(model: Option<Arc<dyn Predictor>>) -> Self {
        Self { model }
    }

    pub fn loaded(model: Arc<dyn Predictor>) -> Self {
        Self { model: Some(model) }
    }

    pub fn absent() -> Self {
        Self { model: None }
    }

    pub fn get(&self) -> Option<Arc<dyn Predictor>> {
        self.model.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
