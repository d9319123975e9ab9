use std::path::Path;

use ndarray::Array2;
use serde::Serialize;

use crate::data::PlaySituation;
use crate::error::{Result, XyardsError};
use crate::features::{FeatureEncoding, FeatureVector};
use crate::model::artifact::ModelArtifact;
use crate::model::metrics::{FeatureImportance, TrainingMetrics};
use crate::model::regressor::Regressor;

/// Anything that can turn a situation into expected yards.
///
/// The recommender and simulator are written against this so they can be
/// driven by a trained [`Predictor`] or by a fixed table in tests.
pub trait YardsPredictor {
    fn predict_situation(&self, situation: &PlaySituation) -> Result<f32>;
}

/// Contribution of one column to a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    pub feature: String,
    pub value: f32,
    /// Prediction minus prediction with this column set to its baseline.
    pub contribution: f32,
}

/// Prediction plus its per-column breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub expected_yards: f32,
    pub baseline_yards: f32,
    /// Sorted by decreasing absolute contribution.
    pub attributions: Vec<Attribution>,
}

#[derive(Debug)]
pub struct Predictor {
    artifact: ModelArtifact,
}

impl Predictor {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let artifact = ModelArtifact::load(path)?;
        log::info!(
            "Loaded {} model from {} ({} features)",
            artifact.model.name(),
            path.display(),
            artifact.feature_names.len()
        );
        Ok(Self { artifact })
    }

    /// Wrap an in-memory artifact, running the same checks as [`load`](Self::load).
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate(Path::new("<memory>"))?;
        Ok(Self { artifact })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn encoding(&self) -> &FeatureEncoding {
        &self.artifact.encoding
    }

    pub fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.artifact.metrics
    }

    /// Global importance recorded at training time, most important first.
    pub fn feature_importance(&self) -> &[FeatureImportance] {
        &self.artifact.feature_importance
    }

    /// Expected yards for a vector laid out exactly like the training columns.
    pub fn predict(&self, features: &FeatureVector) -> Result<f32> {
        self.check_vector(features)?;
        let mut out = self.predict_rows(&[features.values().to_vec()])?;
        out.pop().ok_or(XyardsError::ModelNotTrained)
    }

    pub fn encode(&self, situation: &PlaySituation) -> Result<FeatureVector> {
        self.artifact.encoding.encode(situation)
    }

    /// Occlusion attributions against the training column means.
    pub fn explain(&self, features: &FeatureVector) -> Result<Explanation> {
        self.check_vector(features)?;
        let values = features.values();
        let baseline = &self.artifact.feature_baseline;

        // Row 0 is the input, row 1 the baseline, then one row per occluded column.
        let mut rows = Vec::with_capacity(values.len() + 2);
        rows.push(values.to_vec());
        rows.push(baseline.clone());
        for col in 0..values.len() {
            let mut row = values.to_vec();
            row[col] = baseline[col];
            rows.push(row);
        }
        let preds = self.predict_rows(&rows)?;
        let expected_yards = preds[0];

        let mut attributions: Vec<Attribution> = features
            .columns()
            .iter()
            .zip(values)
            .zip(&preds[2..])
            .map(|((name, &value), &occluded)| Attribution {
                feature: name.clone(),
                value,
                contribution: expected_yards - occluded,
            })
            .collect();
        attributions.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));

        Ok(Explanation {
            expected_yards,
            baseline_yards: preds[1],
            attributions,
        })
    }

    fn check_vector(&self, features: &FeatureVector) -> Result<()> {
        features.check_schema(&self.artifact.feature_names)?;
        if let Some((column, &value)) = features
            .columns()
            .iter()
            .zip(features.values())
            .find(|(_, v)| !v.is_finite())
        {
            return Err(XyardsError::InvalidFeatureValue {
                column: column.clone(),
                value,
            });
        }
        Ok(())
    }

    fn predict_rows(&self, rows: &[Vec<f32>]) -> Result<Vec<f32>> {
        let width = self.artifact.feature_names.len();
        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        let x = Array2::from_shape_vec((rows.len(), width), flat).map_err(|e| {
            XyardsError::SchemaMismatch {
                expected: width,
                found: rows.first().map_or(0, Vec::len),
                detail: e.to_string(),
            }
        })?;
        self.artifact.model.predict(&x)
    }
}

impl YardsPredictor for Predictor {
    fn predict_situation(&self, situation: &PlaySituation) -> Result<f32> {
        let features = self.encode(situation)?;
        self.predict(&features)
    }
}

impl<T: YardsPredictor + ?Sized> YardsPredictor for &T {
    fn predict_situation(&self, situation: &PlaySituation) -> Result<f32> {
        (**self).predict_situation(situation)
    }
}

impl<T: YardsPredictor + ?Sized> YardsPredictor for std::sync::Arc<T> {
    fn predict_situation(&self, situation: &PlaySituation) -> Result<f32> {
        (**self).predict_situation(situation)
    }
}
