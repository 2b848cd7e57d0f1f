use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use tracing::{info, warn};

use super::bundle::{ModelBundle, ModelLoadError};
use crate::config::ModelConfig;

/// Where the serialized training artifacts come from.
pub trait ArtifactSource: Send + Sync {
    fn load(&self) -> Result<ModelBundle, ModelLoadError>;
}

/// Reads the tree and encoder artifacts from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArtifacts {
    tree_path: PathBuf,
    encoders_path: PathBuf,
}

impl FileArtifacts {
    pub fn new(tree_path: impl Into<PathBuf>, encoders_path: impl Into<PathBuf>) -> Self {
        Self {
            tree_path: tree_path.into(),
            encoders_path: encoders_path.into(),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.tree_path.clone(), config.encoders_path.clone())
    }
}

fn read_artifact(artifact: &'static str, path: &Path) -> Result<Vec<u8>, ModelLoadError> {
    if !path.exists() {
        return Err(ModelLoadError::Missing {
            artifact,
            path: path.display().to_string(),
        });
    }
    std::fs::read(path).map_err(|source| ModelLoadError::Read {
        artifact,
        path: path.display().to_string(),
        source,
    })
}

impl ArtifactSource for FileArtifacts {
    fn load(&self) -> Result<ModelBundle, ModelLoadError> {
        let tree = read_artifact("tree", &self.tree_path)?;
        let encoders = read_artifact("encoders", &self.encoders_path)?;
        ModelBundle::from_artifacts(&tree, &encoders)
    }
}

/// Lifecycle of the cached model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    LoadFailed,
}

impl LoadState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Loading,
            2 => Self::Loaded,
            3 => Self::LoadFailed,
            _ => Self::Unloaded,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::LoadFailed => "load_failed",
        }
    }
}

#[derive(Debug, Clone)]
struct LoadedModel {
    bundle: Arc<ModelBundle>,
    loaded_at: DateTime<Utc>,
}

/// Lazily loads the model once and serves it lock-free afterwards.
///
/// Concurrent first callers queue on `load_lock`; whoever gets it first loads,
/// the rest find the published bundle. A failed attempt leaves the store
/// unloaded so the next call tries again.
pub struct ModelStore<S> {
    source: S,
    loaded: OnceLock<LoadedModel>,
    load_lock: Mutex<()>,
    state: AtomicU8,
}

impl<S: ArtifactSource> ModelStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            loaded: OnceLock::new(),
            load_lock: Mutex::new(()),
            state: AtomicU8::new(LoadState::Unloaded as u8),
        }
    }

    pub fn get(&self) -> Result<Arc<ModelBundle>, ModelLoadError> {
        if let Some(model) = self.loaded.get() {
            return Ok(model.bundle.clone());
        }

        // The lock only serializes loading; a poisoned guard protects nothing.
        let _guard = self
            .load_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(model) = self.loaded.get() {
            return Ok(model.bundle.clone());
        }

        self.state.store(LoadState::Loading as u8, Ordering::Release);
        info!("loading recommendation model");

        match self.source.load() {
            Ok(bundle) => {
                let model = LoadedModel {
                    bundle: Arc::new(bundle),
                    loaded_at: Utc::now(),
                };
                let bundle = model.bundle.clone();
                info!(
                    nodes = bundle.tree().node_count(),
                    features = bundle.feature_names().len(),
                    products = bundle.target_encoder().len(),
                    "recommendation model loaded"
                );
                // Only this guarded branch ever sets the cell.
                let _ = self.loaded.set(model);
                self.state.store(LoadState::Loaded as u8, Ordering::Release);
                Ok(bundle)
            }
            Err(err) => {
                counter!("model_load_failures_total").increment(1);
                warn!(error = %err, "recommendation model failed to load");
                self.state
                    .store(LoadState::LoadFailed as u8, Ordering::Release);
                Err(err)
            }
        }
    }

    pub fn state(&self) -> LoadState {
        LoadState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded.get().map(|model| model.loaded_at)
    }
}
