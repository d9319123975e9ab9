//! Persisted model + the encoding it was trained with.
//!
//! The artifact is a single JSON document. Loading re-derives the column
//! layout from the stored encoding with the current code and refuses to
//! serve if it no longer matches the layout the booster was fitted on.
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::TrainerConfig;
use crate::error::{Result, XyardsError};
use crate::features::{check_columns, FeatureEncoding, FEATURE_SCHEMA_VERSION};
use crate::model::gbdt::GbdtRegressor;
use crate::model::metrics::{FeatureImportance, TrainingMetrics};
use crate::model::regressor::Regressor;

/// Bumped whenever the artifact layout changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    /// RFC 3339 timestamp of the training run.
    pub trained_at: String,
    pub encoding: FeatureEncoding,
    /// Column order the model was fitted on.
    pub feature_names: Vec<String>,
    /// Training column means; the reference row for attributions.
    pub feature_baseline: Vec<f32>,
    /// Sorted by decreasing importance.
    pub feature_importance: Vec<FeatureImportance>,
    pub metrics: TrainingMetrics,
    pub trainer: TrainerConfig,
    pub model: GbdtRegressor,
}

impl ModelArtifact {
    /// Write atomically: a failed write leaves any previous artifact intact.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = tmp_path(path);
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, self).map_err(std::io::Error::from)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        log::info!("Model saved to: {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(XyardsError::ModelArtifactMissing(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let artifact: ModelArtifact =
            serde_json::from_reader(reader).map_err(|e| XyardsError::ModelArtifactCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        artifact.validate(path)?;
        log::debug!(
            "Loaded model trained at {} with {} features",
            artifact.trained_at,
            artifact.feature_names.len()
        );
        Ok(artifact)
    }

    /// Check that this artifact can be served by the current pipeline.
    pub fn validate(&self, path: &Path) -> Result<()> {
        let corrupt = |reason: String| XyardsError::ModelArtifactCorrupt {
            path: path.to_path_buf(),
            reason,
        };

        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(corrupt(format!(
                "artifact format v{} is stale, this build reads v{}; retrain the model",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        if self.encoding.schema_version != FEATURE_SCHEMA_VERSION {
            return Err(XyardsError::SchemaMismatch {
                expected: self.feature_names.len(),
                found: self.encoding.width(),
                detail: format!(
                    "artifact uses feature schema v{}, pipeline produces v{}",
                    self.encoding.schema_version, FEATURE_SCHEMA_VERSION
                ),
            });
        }

        check_columns(&self.encoding.column_names(), &self.feature_names)?;

        if !self.model.is_trained() {
            return Err(corrupt("model has no fitted trees".to_string()));
        }
        if self.model.feature_size() != self.feature_names.len() {
            return Err(XyardsError::SchemaMismatch {
                expected: self.feature_names.len(),
                found: self.model.feature_size(),
                detail: "booster width differs from recorded columns".to_string(),
            });
        }
        if self.feature_baseline.len() != self.feature_names.len() {
            return Err(corrupt(format!(
                "baseline has {} values for {} columns",
                self.feature_baseline.len(),
                self.feature_names.len()
            )));
        }
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
