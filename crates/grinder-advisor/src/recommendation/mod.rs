//! Questionnaire-driven product recommendation with explanations.
//!
//! Answers are encoded, run through the trained tree, decoded to a product
//! name, and explained by the splits the tree took on the way to its leaf.

pub mod encoding;
pub mod explain;
pub mod model;
pub mod questionnaire;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use encoding::{CategoricalEncoder, EncodedRow, EncodingTable, FallbackEncoder, TargetEncoder};
pub use explain::{fallback_rules, Importance, Rule, RuleExtractor};
pub use model::{
    ArtifactSource, DecisionPath, DecisionTree, EncoderArtifact, FileArtifacts, LoadState,
    ModelBundle, ModelLoadError, ModelStore, NodeDepths,
};
pub use questionnaire::{Answers, MissingAnswers, NoAnswers, Question, QuestionnaireRequest};
pub use router::{recommendation_router, PredictResponse};
pub use service::{HealthReport, HealthStatus, Prediction, PredictionError, PredictionService};
