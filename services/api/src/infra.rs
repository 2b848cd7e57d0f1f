use chrono::{DateTime, Utc};
use grinder_advisor::recommendation::{ArtifactSource, LoadState, PredictionService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Read-only view of the model lifecycle exposed on `/ready`.
pub(crate) trait ModelProbe: Send + Sync {
    fn state(&self) -> LoadState;
    fn loaded_at(&self) -> Option<DateTime<Utc>>;
}

impl<S: ArtifactSource> ModelProbe for PredictionService<S> {
    fn state(&self) -> LoadState {
        self.model_state()
    }

    fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.store().loaded_at()
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) model: Arc<dyn ModelProbe>,
}
