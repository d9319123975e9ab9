use std::time::Instant;

use ndarray::{Array2, Axis};

use crate::config::TrainerConfig;
use crate::data::PlayRecord;
use crate::error::{Result, XyardsError};
use crate::features::FeatureEncoding;
use crate::model::artifact::{ModelArtifact, ARTIFACT_FORMAT_VERSION};
use crate::model::gbdt::GbdtRegressor;
use crate::model::metrics::{RegressionMetrics, TrainingMetrics};
use crate::model::regressor::Regressor;
use crate::train::importance::permutation_importance;
use crate::train::split::split_indices;

/// Largest plausible gain or loss on a single play.
pub const LABEL_LIMIT: f32 = 100.0;

/// Held-out predictions kept for reporting.
#[derive(Debug, Clone, Default)]
pub struct ValidationSet {
    pub actual: Vec<f32>,
    pub predicted: Vec<f32>,
}

/// Result of a training run: the artifact plus what the report needs.
#[derive(Debug)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub validation: ValidationSet,
}

pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn train(&self, records: &[PlayRecord]) -> Result<TrainingOutcome> {
        let start_time = Instant::now();
        validate_records(records)?;

        let encoding = FeatureEncoding::fit(records, &self.config.encoding);
        let feature_names = encoding.column_names();
        let x = encoding.encode_matrix(records)?;
        let y: Vec<f32> = records.iter().map(|r| r.yards_gained).collect();

        log::info!(
            "Training on {} plays with {} features",
            records.len(),
            feature_names.len()
        );

        let (train_idx, val_idx) =
            split_indices(records.len(), self.config.validation_fraction, self.config.seed);
        let (x_train, y_train) = take_rows(&x, &y, &train_idx);
        let (x_val, y_val) = take_rows(&x, &y, &val_idx);

        let mut model = GbdtRegressor::new(self.config.model.clone());
        model.fit(&x_train, &y_train)?;

        let train_pred = model.predict(&x_train)?;
        let val_pred = model.predict(&x_val)?;
        let metrics = TrainingMetrics {
            train: RegressionMetrics::evaluate(&train_pred, &y_train),
            validation: (!y_val.is_empty()).then(|| RegressionMetrics::evaluate(&val_pred, &y_val)),
        };
        metrics.log_summary();

        let feature_importance = if self.config.compute_importance {
            let (ix, iy) = if y_val.is_empty() {
                (&x_train, &y_train)
            } else {
                (&x_val, &y_val)
            };
            permutation_importance(&model, ix, iy, &feature_names, self.config.seed)?
        } else {
            Vec::new()
        };

        let feature_baseline = x_train
            .mean_axis(Axis(0))
            .map(|m| m.to_vec())
            .unwrap_or_else(|| vec![0.0; feature_names.len()]);

        let artifact = ModelArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            trained_at: chrono::Utc::now().to_rfc3339(),
            encoding,
            feature_names,
            feature_baseline,
            feature_importance,
            metrics,
            trainer: self.config.clone(),
            model,
        };

        log::info!("Training completed in {:?}", start_time.elapsed());

        Ok(TrainingOutcome {
            artifact,
            validation: ValidationSet {
                actual: y_val,
                predicted: val_pred,
            },
        })
    }
}

/// Train with `config` and return the artifact alone.
pub fn train(records: &[PlayRecord], config: &TrainerConfig) -> Result<ModelArtifact> {
    Ok(Trainer::new(config.clone())?.train(records)?.artifact)
}

fn validate_records(records: &[PlayRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(XyardsError::EmptyTrainingSet);
    }
    for (index, record) in records.iter().enumerate() {
        let value = record.yards_gained;
        if !value.is_finite() || value.abs() > LABEL_LIMIT {
            return Err(XyardsError::InvalidLabel { index, value });
        }
        record
            .situation
            .validate()
            .map_err(|e| match e {
                XyardsError::InvalidSituation(msg) => {
                    XyardsError::InvalidSituation(format!("record {}: {}", index, msg))
                }
                other => other,
            })?;
    }
    Ok(())
}

fn take_rows(x: &Array2<f32>, y: &[f32], idx: &[usize]) -> (Array2<f32>, Vec<f32>) {
    (x.select(Axis(0), idx), idx.iter().map(|&i| y[i]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelConfig, ModelType};
    use crate::data::{PlaySituation, PlayType};

    fn quick_config() -> TrainerConfig {
        TrainerConfig {
            model: ModelConfig::new(
                0.3,
                ModelType::GBDT {
                    max_depth: 3,
                    num_boost_round: 10,
                    min_leaf_size: 1,
                    debug: false,
                    training_optimization_level: 2,
                    loss_type: "SquaredError".to_string(),
                },
            ),
            ..TrainerConfig::default()
        }
    }

    fn records(n: usize) -> Vec<PlayRecord> {
        (0..n)
            .map(|i| {
                let play_type = if i % 2 == 0 { PlayType::Pass } else { PlayType::Run };
                let situation = PlaySituation::new((i % 4 + 1) as u8, 10.0, 20.0 + (i % 60) as f32)
                    .with_play_type(play_type)
                    .with_formation(if i % 3 == 0 { "SHOTGUN" } else { "SINGLEBACK" });
                let gained = if play_type == PlayType::Pass { 7.0 } else { 3.0 };
                PlayRecord::new(situation, gained)
            })
            .collect()
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = train(&[], &quick_config()).unwrap_err();
        assert!(matches!(err, XyardsError::EmptyTrainingSet));
    }

    #[test]
    fn out_of_range_label_is_rejected() {
        let mut data = records(10);
        data[4].yards_gained = 150.0;
        let err = train(&data, &quick_config()).unwrap_err();
        assert!(matches!(err, XyardsError::InvalidLabel { index: 4, .. }));

        data[4].yards_gained = f32::NAN;
        assert!(matches!(
            train(&data, &quick_config()),
            Err(XyardsError::InvalidLabel { index: 4, .. })
        ));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = TrainerConfig {
            validation_fraction: 1.5,
            ..quick_config()
        };
        assert!(matches!(Trainer::new(config), Err(XyardsError::InvalidConfig(_))));
    }

    #[test]
    fn artifact_is_consistent() {
        let outcome = Trainer::new(quick_config()).unwrap().train(&records(60)).unwrap();
        let artifact = &outcome.artifact;
        assert_eq!(artifact.feature_names, artifact.encoding.column_names());
        assert_eq!(artifact.feature_baseline.len(), artifact.feature_names.len());
        assert_eq!(artifact.feature_importance.len(), artifact.feature_names.len());
        assert_eq!(artifact.metrics.validation.unwrap().samples, 12);
        assert_eq!(outcome.validation.actual.len(), 12);
        artifact.validate(std::path::Path::new("memory")).unwrap();
    }

    #[test]
    fn single_record_trains_without_validation() {
        let artifact = train(&records(1), &quick_config()).unwrap();
        assert!(artifact.metrics.validation.is_none());
    }
}
