use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::depth::NodeDepths;
use super::tree::{DecisionTree, TreeError};
use crate::recommendation::encoding::{
    CategoricalEncoder, EncodingTable, FallbackEncoder, TargetEncoder,
};

/// Encoder artifact written by the training pipeline next to the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderArtifact {
    pub label_encoders: BTreeMap<String, FallbackEncoder>,
    pub y_encoder: TargetEncoder,
    pub feature_names: Vec<String>,
}

/// Everything inference needs, immutable once built.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    tree: DecisionTree,
    depths: NodeDepths,
    fallback_encoders: BTreeMap<String, FallbackEncoder>,
    target_encoder: TargetEncoder,
    feature_names: Vec<String>,
}

impl ModelBundle {
    pub fn new(tree: DecisionTree, encoders: EncoderArtifact) -> Result<Self, ModelLoadError> {
        tree.validate()?;
        if encoders.feature_names.is_empty() {
            return Err(ModelLoadError::NoFeatures);
        }

        let depths = NodeDepths::from_tree(&tree);
        Ok(Self {
            tree,
            depths,
            fallback_encoders: encoders.label_encoders,
            target_encoder: encoders.y_encoder,
            feature_names: encoders.feature_names,
        })
    }

    /// Deserializes the two training artifacts.
    pub fn from_artifacts(tree: &[u8], encoders: &[u8]) -> Result<Self, ModelLoadError> {
        let tree: DecisionTree = serde_json::from_slice(tree)
            .map_err(|source| ModelLoadError::Parse {
                artifact: "tree",
                source,
            })?;
        let encoders: EncoderArtifact =
            serde_json::from_slice(encoders).map_err(|source| ModelLoadError::Parse {
                artifact: "encoders",
                source,
            })?;
        Self::new(tree, encoders)
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn depths(&self) -> &NodeDepths {
        &self.depths
    }

    pub fn fallback_encoders(&self) -> &BTreeMap<String, FallbackEncoder> {
        &self.fallback_encoders
    }

    pub fn target_encoder(&self) -> &TargetEncoder {
        &self.target_encoder
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn encoder(&self) -> CategoricalEncoder<'_> {
        CategoricalEncoder::new(EncodingTable::standard(), &self.fallback_encoders)
    }
}

/// Failure to produce a [`ModelBundle`]; retried on the next request.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("{artifact} artifact not found at {path}")]
    Missing { artifact: &'static str, path: String },
    #[error("failed to read {artifact} artifact at {path}: {source}")]
    Read {
        artifact: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{artifact} artifact is not valid: {source}")]
    Parse {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("tree artifact is malformed: {0}")]
    Tree(#[from] TreeError),
    #[error("encoders artifact lists no feature names")]
    NoFeatures,
}
