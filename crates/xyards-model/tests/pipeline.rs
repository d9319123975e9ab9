mod common;

use std::sync::Arc;

use common::{init_logger, quick_config, synthetic_plays, trained_artifact};
use xyards_model::data::{PlaySituation, PlayType};
use xyards_model::features::FeatureVector;
use xyards_model::model::{ModelArtifact, ARTIFACT_FORMAT_VERSION};
use xyards_model::predict::{ModelCache, Predictor, YardsPredictor};
use xyards_model::recommend::recommend;
use xyards_model::train::Trainer;
use xyards_model::XyardsError;

fn third_and_seven() -> PlaySituation {
    PlaySituation::new(3, 7.0, 45.0).with_formation("shotgun")
}

#[test]
fn artifact_survives_a_round_trip_through_disk() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models").join("xy.json");

    let artifact = trained_artifact();
    artifact.save(&path).unwrap();
    assert!(!path.with_file_name("xy.json.tmp").exists());
    let trained_names = artifact.feature_names.clone();
    let before = Predictor::from_artifact(artifact)
        .unwrap()
        .predict_situation(&third_and_seven())
        .unwrap();

    let predictor = Predictor::load(&path).unwrap();
    let after = predictor.predict_situation(&third_and_seven()).unwrap();
    assert_eq!(before, after);
    assert_eq!(predictor.feature_names(), trained_names.as_slice());
    assert!(!predictor.feature_importance().is_empty());
}

#[test]
fn training_is_deterministic_for_a_seed() {
    let plays = synthetic_plays(200, 3);
    let a = Trainer::new(quick_config()).unwrap().train(&plays).unwrap();
    let b = Trainer::new(quick_config()).unwrap().train(&plays).unwrap();
    assert_eq!(a.artifact.metrics, b.artifact.metrics);
    assert_eq!(a.validation.actual, b.validation.actual);
}

#[test]
fn model_learns_that_passing_gains_more() {
    let predictor = Predictor::from_artifact(trained_artifact()).unwrap();
    let s = PlaySituation::new(1, 10.0, 60.0).with_formation("singleback");
    let pass = predictor
        .predict_situation(&s.clone().with_play_type(PlayType::Pass))
        .unwrap();
    let run = predictor
        .predict_situation(&s.with_play_type(PlayType::Run))
        .unwrap();
    assert!(pass > run, "pass {pass} run {run}");
}

#[test]
fn recommender_ranks_each_candidate_once() {
    let predictor = Predictor::from_artifact(trained_artifact()).unwrap();
    let first = recommend(&predictor, &third_and_seven(), &[PlayType::Run, PlayType::Pass]).unwrap();
    let again = recommend(&predictor, &third_and_seven(), &[PlayType::Run, PlayType::Pass]).unwrap();
    assert_eq!(first, again);

    assert_eq!(first.ranked.len(), 2);
    assert!(first.ranked.iter().any(|r| r.play_type == PlayType::Run));
    assert!(first.ranked.iter().any(|r| r.play_type == PlayType::Pass));
    assert!(first.ranked[0].expected_yards >= first.ranked[1].expected_yards);
    assert!(first.ranked.iter().all(|r| r.expected_yards.is_finite()));
}

#[test]
fn unseen_formation_falls_back() {
    let predictor = Predictor::from_artifact(trained_artifact()).unwrap();
    let s = PlaySituation::new(2, 5.0, 30.0).with_formation("Wildcat Jumbo");

    let (vector, unseen) = predictor.encoding().encode_with_fallbacks(&s).unwrap();
    assert_eq!(unseen.len(), 1);
    assert_eq!(vector.get("formation_unknown"), Some(1.0));

    let yards = predictor.predict_situation(&s).unwrap();
    assert!(yards.is_finite());
}

#[test]
fn reordered_vector_is_rejected() {
    let predictor = Predictor::from_artifact(trained_artifact()).unwrap();
    let (mut columns, mut values) = predictor.encode(&third_and_seven()).unwrap().into_parts();
    columns.swap(0, 1);
    values.swap(0, 1);
    let shuffled = FeatureVector::new(columns, values).unwrap();
    assert!(matches!(
        predictor.predict(&shuffled),
        Err(XyardsError::SchemaMismatch { .. })
    ));
}

#[test]
fn non_finite_feature_is_rejected() {
    let predictor = Predictor::from_artifact(trained_artifact()).unwrap();
    let mut vector = predictor.encode(&third_and_seven()).unwrap();
    assert!(vector.set("score_diff", f32::NAN));
    let err = predictor.predict(&vector).unwrap_err();
    assert!(matches!(err, XyardsError::InvalidFeatureValue { ref column, .. } if column == "score_diff"));
}

#[test]
fn explanation_is_sorted_by_magnitude() {
    let predictor = Predictor::from_artifact(trained_artifact()).unwrap();
    let vector = predictor.encode(&third_and_seven()).unwrap();
    let explanation = predictor.explain(&vector).unwrap();

    assert_eq!(explanation.expected_yards, predictor.predict(&vector).unwrap());
    assert_eq!(explanation.attributions.len(), vector.len());
    for pair in explanation.attributions.windows(2) {
        assert!(pair[0].contribution.abs() >= pair[1].contribution.abs());
    }
}

#[test]
fn wider_pipeline_than_trained_model_is_a_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xy.json");
    trained_artifact().save(&path).unwrap();

    // The stored encoding now yields one more column than the model was fitted on.
    let mut doc: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    doc["encoding"]["formation"]["categories"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::Value::from("zz_wildcat"));
    std::fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

    match ModelArtifact::load(&path) {
        Err(XyardsError::SchemaMismatch { expected, found, .. }) => assert_eq!(found, expected + 1),
        other => panic!("expected SchemaMismatch, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn stale_artifact_format_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xy.json");
    trained_artifact().save(&path).unwrap();

    let mut doc: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    doc["format_version"] = serde_json::Value::from(ARTIFACT_FORMAT_VERSION + 1);
    std::fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

    let err = ModelArtifact::load(&path).unwrap_err();
    assert!(matches!(err, XyardsError::ModelArtifactCorrupt { .. }));
    assert!(err.is_setup_error());
}

#[test]
fn cache_loads_once_and_shares() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xy.json");
    let cache = ModelCache::new(&path);
    assert!(matches!(cache.get(), Err(XyardsError::ModelArtifactMissing(_))));

    trained_artifact().save(&path).unwrap();
    let first = cache.get().unwrap();
    std::fs::remove_file(&path).unwrap();
    let second = cache.get().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(cache.is_loaded());
}
