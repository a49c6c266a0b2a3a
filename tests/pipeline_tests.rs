//! End-to-End Pipeline Tests
//!
//! Trains real (small) models into temp directories and round-trips them
//! through the inference entry point.

use soil_scorer_rust::{
    HealthLabel, ModelMeta, PredictError, Predictor, ScoringConfig, TrainingPipeline,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SAMPLES_PER_CLASS: usize = 500;

fn train_into(dir: &Path, seed: u64) -> soil_scorer_rust::TrainingReport {
    let pipeline = TrainingPipeline::new(
        ScoringConfig::default(),
        dir.join("soil_model.bin"),
        dir.join("model_meta.json"),
    )
    .with_seed(seed);
    pipeline.run_synthetic(SAMPLES_PER_CLASS).unwrap()
}

#[test]
fn test_quick_training_persists_artifacts_and_reports() {
    let dir = tempdir().unwrap();
    let report = train_into(dir.path(), 42);

    assert!(dir.path().join("soil_model.bin").exists());
    assert!(dir.path().join("model_meta.json").exists());

    // Synthetic classes are separable; the tree should be near-perfect
    assert!(report.accuracy > 0.95, "accuracy was {}", report.accuracy);
    assert_eq!(report.per_class.len(), 3);
    assert_eq!(
        report.train_rows + report.test_rows,
        SAMPLES_PER_CLASS * 3
    );

    let meta = ModelMeta::load(&dir.path().join("model_meta.json")).unwrap();
    assert_eq!(meta, ModelMeta::canonical());
}

#[test]
fn test_trained_model_predicts_in_distribution_samples() {
    let dir = tempdir().unwrap();
    train_into(dir.path(), 42);

    let predictor = Predictor::load(
        &dir.path().join("soil_model.bin"),
        &dir.path().join("model_meta.json"),
    )
    .unwrap();

    assert_eq!(
        predictor.predict(10.0, 5.0, 20.0, 4.5).unwrap(),
        HealthLabel::Poor
    );
    assert_eq!(
        predictor.predict(30.0, 20.0, 80.0, 5.7).unwrap(),
        HealthLabel::Average
    );
    assert_eq!(
        predictor.predict(80.0, 60.0, 200.0, 7.0).unwrap(),
        HealthLabel::Optimal
    );
}

#[test]
fn test_missing_manifest_degrades_to_canonical_order() {
    let dir = tempdir().unwrap();
    train_into(dir.path(), 42);
    fs::remove_file(dir.path().join("model_meta.json")).unwrap();

    let predictor = Predictor::load(
        &dir.path().join("soil_model.bin"),
        &dir.path().join("model_meta.json"),
    )
    .unwrap();
    assert_eq!(predictor.meta(), &ModelMeta::canonical());

    // Still answers requests
    assert_eq!(
        predictor.predict(10.0, 5.0, 20.0, 4.5).unwrap(),
        HealthLabel::Poor
    );
}

#[test]
fn test_missing_model_fails_fast() {
    let dir = tempdir().unwrap();
    let err = Predictor::load(
        &dir.path().join("soil_model.bin"),
        &dir.path().join("model_meta.json"),
    )
    .unwrap_err();
    assert!(matches!(err, PredictError::ModelUnavailable(_)));
}

#[test]
fn test_same_seed_produces_identical_model() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    train_into(dir_a.path(), 7);
    train_into(dir_b.path(), 7);

    let blob_a = fs::read(dir_a.path().join("soil_model.bin")).unwrap();
    let blob_b = fs::read(dir_b.path().join("soil_model.bin")).unwrap();
    assert_eq!(blob_a, blob_b);
}

#[test]
fn test_csv_training_end_to_end() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("training_data.csv");

    // Optimal-heavy survey with one malformed and one incomplete row; the
    // pipeline must synthesize the missing classes and still train.
    let mut csv = String::from("N,P,K,pH\n");
    for _ in 0..50 {
        csv.push_str("90,60,200,7.0\n");
    }
    csv.push_str("bad,60,200,7.0\n");
    csv.push_str("90,,200,7.0\n");
    fs::write(&csv_path, csv).unwrap();

    let pipeline = TrainingPipeline::new(
        ScoringConfig::default(),
        dir.path().join("soil_model.bin"),
        dir.path().join("model_meta.json"),
    );
    let report = pipeline.run_from_csv(csv_path.to_str().unwrap()).unwrap();

    assert!(report.train_rows > 0);
    assert!(dir.path().join("soil_model.bin").exists());

    let predictor = Predictor::load(
        &dir.path().join("soil_model.bin"),
        &dir.path().join("model_meta.json"),
    )
    .unwrap();
    assert_eq!(
        predictor.predict(10.0, 5.0, 20.0, 4.5).unwrap(),
        HealthLabel::Poor
    );
}
