use metrics::counter;
use serde::Serialize;
use tracing::debug;

use super::encoding::EncoderError;
use super::explain::{Rule, RuleExtractor};
use super::model::{ArtifactSource, LoadState, ModelLoadError, ModelStore, TreeError};
use super::questionnaire::Answers;

/// Recommended product and the answers that led to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub product: String,
    pub rules: Vec<Rule>,
}

/// Outcome of a health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Composes encoding, inference, decoding, and rule extraction.
pub struct PredictionService<S> {
    store: ModelStore<S>,
}

impl<S: ArtifactSource> PredictionService<S> {
    pub fn new(source: S) -> Self {
        Self {
            store: ModelStore::new(source),
        }
    }

    pub fn predict(&self, answers: &Answers) -> Result<Prediction, PredictionError> {
        let bundle = self.store.get()?;

        let row = bundle
            .feature_names()
            .iter()
            .map(|feature| (feature.as_str(), answers.get(feature).unwrap_or("")));
        let encoded = bundle.encoder().encode(row);

        let path = bundle.tree().decision_path(&encoded.values())?;
        let class_id = bundle.tree().leaf_class(path.leaf)?;
        let product = bundle.target_encoder().decode(class_id)?.to_string();

        let rules = RuleExtractor::new(bundle.tree(), bundle.depths(), bundle.feature_names())
            .extract(&path, answers);

        counter!("predictions_total").increment(1);
        debug!(%product, leaf = path.leaf, rules = rules.len(), "prediction served");

        Ok(Prediction { product, rules })
    }

    /// Loads the model if needed and reports whether predictions can be served.
    pub fn health(&self) -> HealthReport {
        match self.store.get() {
            Ok(_) => HealthReport {
                status: HealthStatus::Ok,
                message: "Prediction service is up".to_string(),
            },
            Err(err) => HealthReport {
                status: HealthStatus::Error,
                message: err.to_string(),
            },
        }
    }

    /// Eager load attempt at startup.
    pub fn warm_up(&self) -> Result<(), ModelLoadError> {
        self.store.get().map(|_| ())
    }

    pub fn model_state(&self) -> LoadState {
        self.store.state()
    }

    pub fn store(&self) -> &ModelStore<S> {
        &self.store
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Model(#[from] ModelLoadError),
    #[error("inference failed: {0}")]
    Inference(#[from] TreeError),
    #[error("cannot decode prediction: {0}")]
    Decode(#[from] EncoderError),
}
