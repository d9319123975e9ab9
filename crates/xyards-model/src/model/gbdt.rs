use std::fmt;

use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::{ModelConfig, ModelType};
use crate::error::{Result, XyardsError};
use crate::model::regressor::Regressor;

/// Gradient Boosting Decision Tree (GBDT) regressor
#[derive(Serialize, Deserialize)]
pub struct GbdtRegressor {
    params: ModelConfig,
    feature_size: usize,
    model: Option<GBDT>,
}

impl GbdtRegressor {
    pub fn new(params: ModelConfig) -> Self {
        GbdtRegressor {
            params,
            feature_size: 0,
            model: None,
        }
    }

    pub fn params(&self) -> &ModelConfig {
        &self.params
    }

    fn to_data_vec(x: &Array2<f32>, labels: Option<&[f32]>) -> DataVec {
        let mut rows = DataVec::with_capacity(x.nrows());
        for (i, row) in x.rows().into_iter().enumerate() {
            let label = labels.map_or(0.0, |y| y[i]);
            rows.push(Data::new_training_data(row.to_vec(), 1.0, label, None));
        }
        rows
    }
}

impl fmt::Debug for GbdtRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GbdtRegressor")
            .field("params", &self.params)
            .field("feature_size", &self.feature_size)
            .field("trained", &self.model.is_some())
            .finish()
    }
}

impl Regressor for GbdtRegressor {
    fn fit(&mut self, x: &Array2<f32>, y: &[f32]) -> Result<()> {
        if x.nrows() == 0 {
            return Err(XyardsError::EmptyTrainingSet);
        }
        if x.nrows() != y.len() {
            return Err(XyardsError::SchemaMismatch {
                expected: x.nrows(),
                found: y.len(),
                detail: "feature rows and labels differ in length".to_string(),
            });
        }

        let feature_size = x.ncols();

        match &self.params.model_type {
            ModelType::GBDT {
                max_depth,
                num_boost_round,
                min_leaf_size,
                debug,
                training_optimization_level,
                loss_type,
            } => {
                let mut config = Config::new();

                config.set_feature_size(feature_size);
                config.set_shrinkage(self.params.learning_rate);
                config.set_max_depth(*max_depth);
                config.set_min_leaf_size(*min_leaf_size);
                config.set_iterations(*num_boost_round as usize);
                config.set_debug(*debug);
                config.set_training_optimization_level(*training_optimization_level);
                config.set_loss(loss_type);

                let mut gbdt = GBDT::new(&config);
                let mut train_x = Self::to_data_vec(x, Some(y));

                log::debug!(
                    "Fitting GBDT: {} rows x {} features, {} rounds, depth {}",
                    x.nrows(),
                    feature_size,
                    num_boost_round,
                    max_depth
                );
                gbdt.fit(&mut train_x);

                self.model = Some(gbdt);
                self.feature_size = feature_size;
            }
        }
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<f32>> {
        let model = self.model.as_ref().ok_or(XyardsError::ModelNotTrained)?;
        if x.ncols() != self.feature_size {
            return Err(XyardsError::SchemaMismatch {
                expected: self.feature_size,
                found: x.ncols(),
                detail: "input matrix width differs from the fitted model".to_string(),
            });
        }
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }
        let test_x = Self::to_data_vec(x, None);
        Ok(model.predict(&test_x))
    }

    fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    fn feature_size(&self) -> usize {
        self.feature_size
    }

    fn name(&self) -> &str {
        self.params.model_type.name()
    }
}
