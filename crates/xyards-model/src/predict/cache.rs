use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::Result;
use crate::predict::predictor::Predictor;

/// Environment variable naming the artifact to serve.
pub const MODEL_PATH_ENV: &str = "XYARDS_MODEL";
pub const DEFAULT_MODEL_PATH: &str = "models/expected_yards_model.json";

/// Artifact path from `XYARDS_MODEL`, or the default location.
pub fn default_model_path() -> PathBuf {
    env::var_os(MODEL_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Loads a predictor on first use and hands out shared references after.
///
/// A failed load is not remembered: the next `get` tries the disk again.
#[derive(Debug)]
pub struct ModelCache {
    path: PathBuf,
    cell: OnceCell<Arc<Predictor>>,
}

impl ModelCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<Arc<Predictor>> {
        self.cell
            .get_or_try_init(|| {
                log::debug!("Model cache miss, loading {}", self.path.display());
                Predictor::load(&self.path).map(Arc::new)
            })
            .map(Arc::clone)
    }
}

static GLOBAL: OnceCell<ModelCache> = OnceCell::new();

/// Process-wide cache. The path is fixed by the first caller (or
/// [`default_model_path`] when `None`); later paths are ignored.
pub fn global_cache(path: Option<&Path>) -> &'static ModelCache {
    GLOBAL.get_or_init(|| {
        ModelCache::new(path.map(Path::to_path_buf).unwrap_or_else(default_model_path))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XyardsError;

    #[test]
    fn failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ModelCache::new(dir.path().join("missing.json"));
        assert!(matches!(cache.get(), Err(XyardsError::ModelArtifactMissing(_))));
        assert!(!cache.is_loaded());
        assert!(matches!(cache.get(), Err(XyardsError::ModelArtifactMissing(_))));
    }
}
