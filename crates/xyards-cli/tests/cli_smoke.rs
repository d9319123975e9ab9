//! CLI binary smoke tests using assert_cmd.

use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("xyards").unwrap();
    cmd.env_remove("XYARDS_MODEL");
    cmd
}

fn write_plays(dir: &Path) -> PathBuf {
    let path = dir.join("pbp.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "posteam,qtr,down,ydstogo,yardline_100,play_type,yards_gained,offense_formation,rusher_player_name,receiver_player_name"
    )
    .unwrap();
    for i in 0..120 {
        let (play_type, yards, rusher, receiver) = if i % 2 == 0 {
            ("pass", 6 + i % 5, "", "T.Kelce")
        } else {
            ("run", 2 + i % 4, "I.Pacheco", "")
        };
        let formation = if i % 3 == 0 { "SHOTGUN" } else { "SINGLEBACK" };
        writeln!(
            file,
            "KC,{},{},{},{},{},{},{},{},{}",
            i % 4 + 1,
            i % 4 + 1,
            i % 10 + 1,
            (i * 13) % 90 + 5,
            play_type,
            yards,
            formation,
            rusher,
            receiver
        )
        .unwrap();
    }
    path
}

fn train_model(dir: &Path) -> PathBuf {
    let data = write_plays(dir);
    let model = dir.join("model.json");
    cmd()
        .args(["train", "-d"])
        .arg(&data)
        .arg("-o")
        .arg(&model)
        .args(["--rounds", "15", "--no-report"])
        .assert()
        .success();
    model
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("train"))
        .stdout(predicate::str::contains("recommend"))
        .stdout(predicate::str::contains("simulate"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xyards"));
}

// ---------------------------------------------------------------------------
// Train
// ---------------------------------------------------------------------------

#[test]
fn train_no_config_prints_template() {
    cmd()
        .arg("train")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"train_data\""))
        .stdout(predicate::str::contains("\"validation_fraction\""))
        .stderr(predicate::str::contains("No config file provided"));
}

#[test]
fn train_nonexistent_config_errors() {
    cmd()
        .args(["train", "/nonexistent/config.json"])
        .assert()
        .failure();
}

#[test]
fn train_writes_model_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_plays(dir.path());
    let model = dir.path().join("out").join("model.json");
    let report = dir.path().join("report.html");

    cmd()
        .args(["train", "-d"])
        .arg(&data)
        .arg("-o")
        .arg(&model)
        .arg("--report")
        .arg(&report)
        .args(["--rounds", "10"])
        .assert()
        .success();

    assert!(model.exists());
    let html = std::fs::read_to_string(&report).unwrap();
    assert!(html.contains("Expected Yards Training Report"));
}

#[test]
fn failed_training_leaves_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("empty.csv");
    std::fs::write(&data, "down,ydstogo,yardline_100,yards_gained,play_type\n").unwrap();
    let model = dir.path().join("model.json");

    cmd()
        .args(["train", "--no-report", "-d"])
        .arg(&data)
        .arg("-o")
        .arg(&model)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Training set is empty"));
    assert!(!model.exists());
}

#[test]
fn config_hyperparameters_survive_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_plays(dir.path());
    {
        let mut file = std::fs::OpenOptions::new().append(true).open(&data).unwrap();
        writeln!(file, "KC,1,2,0,60,pass,3,SHOTGUN,,T.Kelce").unwrap();
        writeln!(file, "KC,1,3,5,130,run,2,SHOTGUN,I.Pacheco,").unwrap();
    }
    let config = dir.path().join("train.json");
    std::fs::write(
        &config,
        r#"{
            "report_file": null,
            "filter_outliers": false,
            "trainer": {
                "model": {
                    "learning_rate": 0.1,
                    "GBDT": {
                        "max_depth": 2,
                        "num_boost_round": 5,
                        "min_leaf_size": 1,
                        "debug": false,
                        "training_optimization_level": 2,
                        "loss_type": "SquaredError"
                    }
                }
            }
        }"#,
    )
    .unwrap();
    let model = dir.path().join("model.json");

    cmd()
        .arg("train")
        .arg(&config)
        .arg("-d")
        .arg(&data)
        .arg("-o")
        .arg(&model)
        .args(["--rounds", "7"])
        .assert()
        .success();

    let doc: serde_json::Value = serde_json::from_slice(&std::fs::read(&model).unwrap()).unwrap();
    let gbdt = &doc["trainer"]["model"]["GBDT"];
    assert_eq!(gbdt["max_depth"], 2);
    assert_eq!(gbdt["num_boost_round"], 7);
}

#[test]
fn model_type_flag_is_not_accepted() {
    cmd()
        .args(["train", "--model-type", "gbdt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--model-type"));
}

#[test]
fn unwritable_report_leaves_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_plays(dir.path());
    let model = dir.path().join("model.json");

    cmd()
        .args(["train", "-d"])
        .arg(&data)
        .arg("-o")
        .arg(&model)
        .arg("--report")
        .arg(dir.path())
        .args(["--rounds", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to write report"));
    assert!(!model.exists());
}

// ---------------------------------------------------------------------------
// Serving
// ---------------------------------------------------------------------------

#[test]
fn missing_model_prints_setup_instructions() {
    cmd()
        .args(["predict", "--down", "1", "--distance", "10", "--yardline", "75"])
        .env("XYARDS_MODEL", "/nonexistent/model.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("xyards train"));
}

#[test]
fn stale_feature_schema_prints_setup_instructions() {
    let dir = tempfile::tempdir().unwrap();
    let model = train_model(dir.path());

    let mut doc: serde_json::Value = serde_json::from_slice(&std::fs::read(&model).unwrap()).unwrap();
    let version = doc["encoding"]["schema_version"].as_u64().unwrap();
    doc["encoding"]["schema_version"] = serde_json::Value::from(version + 1);
    std::fs::write(&model, serde_json::to_vec(&doc).unwrap()).unwrap();

    cmd()
        .args(["recommend", "--down", "3", "--distance", "7", "--yardline", "45", "--model"])
        .arg(&model)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("feature schema"))
        .stderr(predicate::str::contains("xyards train"));
}

#[test]
fn predict_and_recommend_with_trained_model() {
    let dir = tempfile::tempdir().unwrap();
    let model = train_model(dir.path());

    cmd()
        .args(["predict", "--down", "3", "--distance", "7", "--yardline", "45"])
        .args(["--formation", "shotgun", "--explain", "--model"])
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::contains("expected yards"))
        .stdout(predicate::str::contains("Top contributions"));

    let output = cmd()
        .args(["recommend", "--down", "3", "--distance", "7", "--yardline", "45"])
        .args(["--formation", "shotgun", "--json"])
        .env("XYARDS_MODEL", &model)
        .output()
        .unwrap();
    assert!(output.status.success());
    let rec: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ranked = rec["ranked"].as_array().unwrap();
    assert_eq!(ranked.len(), 2);
    assert!(ranked[0]["expected_yards"].as_f64().unwrap() >= ranked[1]["expected_yards"].as_f64().unwrap());
}

#[test]
fn simulate_preset_drive() {
    let dir = tempfile::tempdir().unwrap();
    let model = train_model(dir.path());
    let trace = dir.path().join("drive.csv");

    cmd()
        .args(["simulate", "--scenario", "opening-drive", "--plays", "run,pass,pass,run"])
        .arg("--model")
        .arg(&model)
        .arg("-o")
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("Result:"));

    let csv = std::fs::read_to_string(&trace).unwrap();
    assert!(csv.starts_with("play_number,down,distance,yardline_100,play_type"));
}

#[test]
fn simulate_rejects_unknown_play_type() {
    cmd()
        .args(["simulate", "--scenario", "red-zone-opportunity", "--plays", "run,punt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown play type"));
}

#[test]
fn unknown_scenario_is_a_usage_error() {
    cmd()
        .args(["recommend", "--scenario", "hail-mary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("goal-line-stand"));
}

// ---------------------------------------------------------------------------
// Summarize
// ---------------------------------------------------------------------------

#[test]
fn summarize_team_and_player() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_plays(dir.path());

    cmd()
        .arg("summarize")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Plays:              120"));

    cmd()
        .arg("summarize")
        .arg(&data)
        .args(["--team", "KC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T.Kelce"));

    cmd()
        .arg("summarize")
        .arg(&data)
        .args(["--team", "KC", "--player", "I.Pacheco", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"plays\": 60"));
}
