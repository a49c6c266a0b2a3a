//! Soil Health Scorer
//!
//! Assigns a categorical soil-health label (Poor / Average / Optimal) to a
//! sample described by N, P, K and pH, and trains/serves a classifier that
//! approximates that rule:
//!
//! - `config`: immutable cutoff tables and pipeline knobs
//! - `scorer`: the deterministic ground-truth rule (sub-scores + aggregation)
//! - `synth`: class-conditional synthesis and proportional class balancing
//! - `data`: survey CSV loading with row-level recovery
//! - `meta`: the persisted feature-order contract
//! - `pipeline`: label -> balance -> split -> fit -> evaluate -> persist
//! - `predict`: single-sample inference against the persisted artifacts

pub mod config;
pub mod data;
pub mod meta;
pub mod pipeline;
pub mod predict;
pub mod sample;
pub mod scorer;
pub mod synth;

// Re-export commonly used types
pub use config::ScoringConfig;
pub use meta::{ModelMeta, CANONICAL_FEATURES};
pub use pipeline::{TrainingPipeline, TrainingReport, DEFAULT_SEED};
pub use predict::{PredictError, Predictor};
pub use sample::{HealthLabel, LabeledSample, SoilSample};
pub use scorer::{Nutrient, SubScores, ThresholdScorer};
pub use synth::DatasetSynthesizer;
