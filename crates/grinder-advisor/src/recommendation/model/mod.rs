//! Trained tree, its encoders, and the lazily loaded cache around them.

mod bundle;
mod depth;
mod store;
mod tree;

pub use bundle::{EncoderArtifact, ModelBundle, ModelLoadError};
pub use depth::NodeDepths;
pub use store::{ArtifactSource, FileArtifacts, LoadState, ModelStore};
pub use tree::{DecisionPath, DecisionTree, TreeError, TREE_LEAF, TREE_UNDEFINED};
