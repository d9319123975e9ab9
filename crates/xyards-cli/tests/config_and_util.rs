//! Integration tests for CLI config parsing and util helpers.

use xyards_cli::commands::train::{load_train_config, TrainCommandConfig};
use xyards_cli::util::{parse_list, setup_instructions, validate_tsv_or_csv_file};
use xyards_model::data::PlayType;
use xyards_model::XyardsError;

// ---------------------------------------------------------------------------
// validate_tsv_or_csv_file
// ---------------------------------------------------------------------------

#[test]
fn validate_csv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(path.to_str().unwrap()).is_ok());
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(path.to_str().unwrap()).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_tsv_or_csv_file("/nonexistent/path/data.tsv").is_err());
}

// ---------------------------------------------------------------------------
// TrainCommandConfig
// ---------------------------------------------------------------------------

#[test]
fn train_config_defaults() {
    let cfg = TrainCommandConfig::default();
    assert_eq!(cfg.output_file, "models/expected_yards_model.json");
    assert!(cfg.report_file.is_some());
    assert_eq!(cfg.trainer.seed, 42);
    assert!((cfg.trainer.validation_fraction - 0.2).abs() < 1e-12);
}

#[test]
fn partial_config_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.json");
    std::fs::write(
        &path,
        r#"{ "train_data": "pbp_2023.csv", "trainer": { "seed": 7, "model": { "learning_rate": 0.05, "GBDT": { "max_depth": 4, "num_boost_round": 50, "min_leaf_size": 5, "debug": false, "training_optimization_level": 2, "loss_type": "SquaredError" } } } }"#,
    )
    .unwrap();

    let cfg = load_train_config(&path).unwrap();
    assert_eq!(cfg.train_data, "pbp_2023.csv");
    assert_eq!(cfg.trainer.seed, 7);
    assert!((cfg.trainer.model.learning_rate - 0.05).abs() < 1e-6);
    assert!((cfg.trainer.validation_fraction - 0.2).abs() < 1e-12);
    assert!(cfg.filter_outliers);
}

#[test]
fn template_round_trips() {
    let json = serde_json::to_string_pretty(&TrainCommandConfig::default()).unwrap();
    let back: TrainCommandConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.trainer, TrainCommandConfig::default().trainer);
}

#[test]
fn malformed_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_train_config(&path).is_err());
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[test]
fn play_lists_parse_and_reject() {
    let plays = parse_list("run, pass,,rush", str::parse::<PlayType>).unwrap();
    assert_eq!(plays, vec![PlayType::Run, PlayType::Pass, PlayType::Run]);
    assert!(parse_list("run,kneel", str::parse::<PlayType>).is_err());
}

#[test]
fn setup_message_mentions_training() {
    let msg = setup_instructions(&XyardsError::ModelArtifactMissing("m.json".into()));
    assert!(msg.contains("m.json"));
    assert!(msg.contains("xyards train"));
}
