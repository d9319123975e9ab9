use serde::{Deserialize, Serialize};

use crate::error::{Result, XyardsError};

/// Central configuration for the regression model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub learning_rate: f32,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    GBDT {
        max_depth: u32,
        num_boost_round: u32,
        min_leaf_size: usize,
        debug: bool,
        training_optimization_level: u8,
        loss_type: String,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::GBDT {
            max_depth: 6,
            num_boost_round: 200,
            min_leaf_size: 1,
            debug: false,
            training_optimization_level: 2,
            loss_type: "SquaredError".to_string(),
        }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::GBDT { .. } => "gbdt",
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f32, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(XyardsError::InvalidConfig(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        match &self.model_type {
            ModelType::GBDT {
                max_depth,
                num_boost_round,
                loss_type,
                ..
            } => {
                if *max_depth == 0 {
                    return Err(XyardsError::InvalidConfig("max_depth must be > 0".into()));
                }
                if *num_boost_round == 0 {
                    return Err(XyardsError::InvalidConfig(
                        "num_boost_round must be > 0".into(),
                    ));
                }
                // Only regression losses make sense for a yards target.
                if !matches!(loss_type.as_str(), "SquaredError" | "LAD") {
                    return Err(XyardsError::InvalidConfig(format!(
                        "unsupported regression loss '{}'",
                        loss_type
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            model_type: ModelType::default(),
        }
    }
}

/// Settings for fitting the categorical vocabularies.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EncodingConfig {
    /// Categories seen fewer times than this fold into the fallback column.
    pub min_category_count: usize,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            min_category_count: 1,
        }
    }
}

/// Everything the trainer needs besides the data itself.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrainerConfig {
    pub model: ModelConfig,
    pub encoding: EncodingConfig,
    /// Share of records held out for validation, in (0, 1).
    pub validation_fraction: f64,
    pub seed: u64,
    pub compute_importance: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            encoding: EncodingConfig::default(),
            validation_fraction: 0.2,
            seed: 42,
            compute_importance: true,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.validation_fraction > 0.0 && self.validation_fraction < 1.0) {
            return Err(XyardsError::InvalidConfig(format!(
                "validation_fraction must be in (0, 1), got {}",
                self.validation_fraction
            )));
        }
        self.model.validate()
    }
}
