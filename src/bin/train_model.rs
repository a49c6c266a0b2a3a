//! Soil-Health Classifier Training
//!
//! With a CSV path argument, trains on the survey data; without one, trains
//! on a fully synthetic balanced dataset (the quick path).
//!
//! Usage:
//!   train_model [training_data.csv]

use anyhow::Result;
use soil_scorer_rust::{ScoringConfig, TrainingPipeline};
use std::time::Instant;

const MODEL_PATH: &str = "soil_model.bin";
const META_PATH: &str = "model_meta.json";

/// Per-class size of the quick synthetic dataset.
const QUICK_SAMPLES_PER_CLASS: usize = 10_000;

fn main() -> Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("SOIL HEALTH CLASSIFIER TRAINING");
    println!("{}", "=".repeat(80));

    let args: Vec<String> = std::env::args().collect();
    let start = Instant::now();

    let pipeline = TrainingPipeline::new(
        ScoringConfig::default(),
        MODEL_PATH.into(),
        META_PATH.into(),
    );

    let report = match args.get(1) {
        Some(csv_path) => pipeline.run_from_csv(csv_path)?,
        None => {
            println!("\nNo dataset supplied; using the quick synthetic path.");
            pipeline.run_synthetic(QUICK_SAMPLES_PER_CLASS)?
        }
    };

    println!("\nTraining Results:");
    println!("Accuracy Score: {:.4}", report.accuracy);
    println!("\nClassification Report:");
    println!("{}", report.classification_report());
    println!(
        "Trained on {} rows, evaluated on {} rows in {:.1}s",
        report.train_rows,
        report.test_rows,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
