use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use xyards_model::config::{ModelType, TrainerConfig};
use xyards_model::data::{read_plays_with_config, PlayReaderConfig};
use xyards_model::model::ModelArtifact;
use xyards_model::predict::DEFAULT_MODEL_PATH;
use xyards_model::report::training_report;
use xyards_model::train::Trainer;

use crate::util::validate_tsv_or_csv_file;

/// Parameters for `xyards train`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainCommandConfig {
    pub train_data: String,
    pub output_file: String,
    /// HTML report path; `None` disables the report.
    pub report_file: Option<String>,
    /// Drop implausible plays while reading.
    pub filter_outliers: bool,
    pub trainer: TrainerConfig,
}

impl Default for TrainCommandConfig {
    fn default() -> Self {
        Self {
            train_data: String::from("play_by_play.csv"),
            output_file: String::from(DEFAULT_MODEL_PATH),
            report_file: Some(String::from("xyards_training_report.html")),
            filter_outliers: true,
            trainer: TrainerConfig::default(),
        }
    }
}

pub fn load_train_config<P: AsRef<Path>>(path: P) -> Result<TrainCommandConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: TrainCommandConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

impl TrainCommandConfig {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_train_config(path)?,
            None => TrainCommandConfig::default(),
        };

        if let Some(train_data) = matches.get_one::<String>("train_data") {
            config.train_data = train_data.clone();
        }
        validate_tsv_or_csv_file(&config.train_data)?;

        if let Some(output_file) = matches.get_one::<String>("output_file") {
            config.output_file = output_file.clone();
        }
        if let Some(report_file) = matches.get_one::<String>("report_file") {
            config.report_file = Some(report_file.clone());
        }
        if matches.get_flag("no_report") {
            config.report_file = None;
        }
        if let Some(&rounds) = matches.get_one::<u32>("rounds") {
            let ModelType::GBDT {
                num_boost_round, ..
            } = &mut config.trainer.model.model_type;
            *num_boost_round = rounds;
        }
        if let Some(&seed) = matches.get_one::<u64>("seed") {
            config.trainer.seed = seed;
        }

        config.trainer.validate()?;
        Ok(config)
    }
}

pub fn run_training(config: &TrainCommandConfig) -> Result<ModelArtifact> {
    let reader_config = PlayReaderConfig {
        filter_outliers: config.filter_outliers,
        ..PlayReaderConfig::default()
    };
    let data = read_plays_with_config(&config.train_data, &reader_config)
        .with_context(|| format!("Failed to read plays from {}", config.train_data))?;

    let trainer = Trainer::new(config.trainer.clone())?;
    let outcome = trainer.train(&data.records).context("Training failed")?;

    // The artifact is the last thing written; any earlier failure leaves none behind.
    if let Some(report_file) = &config.report_file {
        training_report(&outcome.artifact, &outcome.validation)?
            .save_to_file(report_file)
            .with_context(|| format!("Failed to write report to {}", report_file))?;
    }

    outcome
        .artifact
        .save(&config.output_file)
        .with_context(|| format!("Failed to write model to {}", config.output_file))?;

    Ok(outcome.artifact)
}
