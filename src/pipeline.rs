//! Training Pipeline
//!
//! One-way orchestration: Loaded -> Labeled -> (Synthesized?) -> Balanced ->
//! Split -> Fitted -> Evaluated -> Persisted. A failure before persistence
//! requires a full restart; there is no resume from a partial state.
//!
//! Evaluation is operator visibility only and never gates persistence: a
//! low-accuracy model is still saved, because the ground-truth rule (not the
//! accuracy figure) is the acceptance criterion downstream.

use crate::config::ScoringConfig;
use crate::data;
use crate::meta::{ModelMeta, CANONICAL_FEATURES};
use crate::sample::{HealthLabel, LabeledSample, SoilSample};
use crate::scorer::ThresholdScorer;
use crate::synth::{format_distribution, DatasetSynthesizer};
use anyhow::{bail, Context, Result};
use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

/// Seed for every stochastic step (synthesis, resampling, shuffle, split) so
/// accuracy figures reproduce run-to-run on identical input data.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of the balanced set held out for evaluation.
const TRAIN_FRACTION: f32 = 0.8;

const MAX_TREE_DEPTH: usize = 10;

/// Per-class evaluation breakdown.
#[derive(Debug, Clone, Copy)]
pub struct ClassMetrics {
    pub label: HealthLabel,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Evaluation summary returned after a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// End-to-end trainer: labels, balances, fits and persists.
pub struct TrainingPipeline {
    scorer: ThresholdScorer,
    synthesizer: DatasetSynthesizer,
    model_path: PathBuf,
    meta_path: PathBuf,
    seed: u64,
}

impl TrainingPipeline {
    pub fn new(config: ScoringConfig, model_path: PathBuf, meta_path: PathBuf) -> Self {
        TrainingPipeline {
            scorer: ThresholdScorer::new(config.clone()),
            synthesizer: DatasetSynthesizer::new(config),
            model_path,
            meta_path,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Train from a survey CSV: load, label with the ground-truth rule, then
    /// run the shared balance/fit/persist path.
    pub fn run_from_csv(&self, path: &str) -> Result<TrainingReport> {
        println!("Loading data from {}...", path);
        let raw = data::load_samples(path)?;
        println!("  Usable rows: {}", raw.len());
        if raw.is_empty() {
            bail!("No usable rows in {}", path);
        }

        println!("Labeling data against the guideline scoring rule...");
        let labeled: Vec<LabeledSample> = raw
            .into_par_iter()
            .map(|s: SoilSample| self.scorer.label(s))
            .collect();

        self.train(labeled)
    }

    /// Train from a fully synthetic balanced dataset (no CSV required).
    pub fn run_synthetic(&self, n_per_class: usize) -> Result<TrainingReport> {
        println!(
            "Creating balanced synthetic dataset ({} samples per class)...",
            n_per_class
        );
        let mut rng = StdRng::seed_from_u64(self.seed);
        let labeled = self.synthesizer.synthesize_balanced(n_per_class, &mut rng);
        self.train(labeled)
    }

    /// Shared path: synthesize missing classes, balance, split, fit,
    /// evaluate, persist.
    pub fn train(&self, labeled: Vec<LabeledSample>) -> Result<TrainingReport> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let labeled = self.synthesizer.ensure_all_classes_present(labeled, &mut rng);
        println!("Class distribution before balancing: {}", format_distribution(&labeled));

        let mut balanced = self.synthesizer.balance_classes(labeled, &mut rng);
        println!("Class distribution after balancing:  {}", format_distribution(&balanced));

        let max_rows = self.scorer.config().max_training_rows;
        if balanced.len() > max_rows {
            balanced.shuffle(&mut rng);
            balanced.truncate(max_rows);
            println!("Capped training set to {} rows", max_rows);
        }

        // Split. The balanced set is already seed-shuffled, so a head/tail
        // split is deterministic and class-mixed.
        let (records, targets) = to_arrays(&balanced, self.scorer.config());
        let dataset = Dataset::new(records, targets)
            .with_feature_names(CANONICAL_FEATURES.to_vec());
        let (train, test) = dataset.split_with_ratio(TRAIN_FRACTION);
        println!(
            "Split: {} train rows, {} test rows",
            train.nsamples(),
            test.nsamples()
        );

        // Fit the opaque classifier
        println!("Fitting decision tree (Gini, max depth {})...", MAX_TREE_DEPTH);
        let model: DecisionTree<f64, usize> = DecisionTree::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(Some(MAX_TREE_DEPTH))
            .fit(&train)
            .context("Failed to fit decision tree")?;

        // Evaluate (visibility only; never gates persistence)
        let predicted = model.predict(&test);
        let truth: Vec<usize> = test.targets().iter().copied().collect();
        let pred: Vec<usize> = predicted.iter().copied().collect();
        let (accuracy, per_class) = evaluate(&truth, &pred);

        // Persist: model blob first, then the feature-order manifest
        let blob = bincode::serialize(&model).context("Failed to serialize model")?;
        fs::write(&self.model_path, blob)
            .with_context(|| format!("Failed to write model: {:?}", self.model_path))?;
        ModelMeta::canonical().save(&self.meta_path)?;
        println!("Model saved to: {:?}", self.model_path);
        println!("Model metadata saved to: {:?}", self.meta_path);

        Ok(TrainingReport {
            accuracy,
            per_class,
            train_rows: train.nsamples(),
            test_rows: test.nsamples(),
        })
    }
}

/// Build the feature matrix and target vector in canonical feature order.
///
/// Missing K enters the matrix as the midpoint of its "average" band, the
/// numeric counterpart of the scorer treating absent K as average.
fn to_arrays(samples: &[LabeledSample], config: &ScoringConfig) -> (Array2<f64>, Array1<usize>) {
    let k_fill = (config.potassium.c1 + config.potassium.c2) / 2.0;

    let mut flat = Vec::with_capacity(samples.len() * CANONICAL_FEATURES.len());
    let mut targets = Vec::with_capacity(samples.len());
    for l in samples {
        flat.extend_from_slice(&[
            l.sample.n,
            l.sample.p,
            l.sample.k.unwrap_or(k_fill),
            l.sample.ph,
        ]);
        targets.push(l.label.class_index());
    }

    let records = Array2::from_shape_vec((samples.len(), CANONICAL_FEATURES.len()), flat)
        .expect("row-major feature buffer matches sample count");
    (records, Array1::from_vec(targets))
}

/// Accuracy plus per-class precision/recall/F1 from parallel truth and
/// prediction slices.
fn evaluate(truth: &[usize], pred: &[usize]) -> (f64, Vec<ClassMetrics>) {
    let correct = truth.iter().zip(pred).filter(|(t, p)| t == p).count();
    let accuracy = if truth.is_empty() {
        0.0
    } else {
        correct as f64 / truth.len() as f64
    };

    let per_class = HealthLabel::ALL
        .iter()
        .map(|&label| {
            let c = label.class_index();
            let tp = truth
                .iter()
                .zip(pred)
                .filter(|(t, p)| **t == c && **p == c)
                .count() as f64;
            let fp = truth
                .iter()
                .zip(pred)
                .filter(|(t, p)| **t != c && **p == c)
                .count() as f64;
            let fn_ = truth
                .iter()
                .zip(pred)
                .filter(|(t, p)| **t == c && **p != c)
                .count() as f64;

            let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
            let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            ClassMetrics {
                label,
                precision,
                recall,
                f1,
                support: truth.iter().filter(|t| **t == c).count(),
            }
        })
        .collect();

    (accuracy, per_class)
}

impl TrainingReport {
    /// sklearn-style classification report for operator output.
    pub fn classification_report(&self) -> String {
        let mut out = String::from("              precision    recall  f1-score   support\n");
        for m in &self.per_class {
            out.push_str(&format!(
                "{:>12}    {:>6.4}    {:>6.4}    {:>6.4}   {:>7}\n",
                m.label.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_evaluate_perfect_predictions() {
        let truth = vec![0, 1, 2, 0, 1, 2];
        let (accuracy, per_class) = evaluate(&truth, &truth);
        assert_relative_eq!(accuracy, 1.0);
        for m in per_class {
            assert_relative_eq!(m.precision, 1.0);
            assert_relative_eq!(m.recall, 1.0);
            assert_relative_eq!(m.f1, 1.0);
            assert_eq!(m.support, 2);
        }
    }

    #[test]
    fn test_evaluate_per_class_breakdown() {
        // Poor(0): 2 truth, 1 predicted correctly, 1 leaked to Average
        // Average(1): 2 truth, both correct, 1 false positive
        let truth = vec![0, 0, 1, 1];
        let pred = vec![0, 1, 1, 1];
        let (accuracy, per_class) = evaluate(&truth, &pred);
        assert_relative_eq!(accuracy, 0.75);

        let poor = per_class[0];
        assert_relative_eq!(poor.precision, 1.0);
        assert_relative_eq!(poor.recall, 0.5);

        let avg = per_class[1];
        assert_relative_eq!(avg.precision, 2.0 / 3.0);
        assert_relative_eq!(avg.recall, 1.0);
    }

    #[test]
    fn test_evaluate_absent_class_is_zeroed() {
        let truth = vec![0, 0];
        let pred = vec![0, 0];
        let (_, per_class) = evaluate(&truth, &pred);
        let optimal = per_class[2];
        assert_eq!(optimal.support, 0);
        assert_relative_eq!(optimal.precision, 0.0);
        assert_relative_eq!(optimal.f1, 0.0);
    }

    #[test]
    fn test_to_arrays_shape_and_k_fill() {
        let scorer = ThresholdScorer::default();
        let samples = vec![
            scorer.label(SoilSample::new(30.0, 20.0, Some(80.0), 6.5)),
            scorer.label(SoilSample::new(5.0, 5.0, None, 4.0)),
        ];
        let (records, targets) = to_arrays(&samples, &ScoringConfig::default());
        assert_eq!(records.shape(), &[2, 4]);
        assert_eq!(targets.len(), 2);
        // Missing K filled with the average-band midpoint (60 + 130) / 2
        assert_relative_eq!(records[[1, 2]], 95.0);
        assert_eq!(targets[0], HealthLabel::Average.class_index());
        assert_eq!(targets[1], HealthLabel::Poor.class_index());
    }
}
