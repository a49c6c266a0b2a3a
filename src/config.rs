//! Scoring Configuration
//!
//! Every threshold used by the scorer and the synthesizer lives in one
//! immutable struct handed to constructors, so unit tests can inject
//! alternate tables without touching globals.
//!
//! Cutoff source: documented EthioSIS guideline table (mg/kg).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Three increasing cutoffs partitioning a nutrient into four bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoffTriple {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

/// pH banding. Non-monotonic: optimal in the middle band, penalised on
/// both the acidic and the alkaline side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhBands {
    /// Inclusive optimal band (before buffering).
    pub optimal_low: f64,
    pub optimal_high: f64,
    /// Outer edges of the "average" shoulders directly outside optimal.
    pub average_low: f64,
    pub average_high: f64,
}

/// Immutable scoring/synthesis configuration.
///
/// `Default` is the canonical table; `from_json_file` lets an operator trial
/// an alternate table (fields absent from the JSON keep their defaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Buffer subtracted from every cutoff so a value sitting exactly on a
    /// published guideline boundary classifies into the higher category.
    /// This is boundary-inclusivity policy, not measurement tolerance.
    pub eps: f64,

    pub nitrogen: CutoffTriple,
    pub phosphorus: CutoffTriple,
    pub potassium: CutoffTriple,
    pub ph: PhBands,

    /// Composite-index cut points: total <= poor_max_total -> Poor,
    /// total <= average_max_total -> Average, above -> Optimal.
    /// Tuned against this table's composite range of [4, 15].
    pub poor_max_total: u8,
    pub average_max_total: u8,

    /// Samples generated per class when a label has zero real members.
    pub synthetic_per_class: usize,

    /// Hard cap on the per-class target during balancing.
    pub balance_cap: usize,

    /// Cap on the balanced set handed to the classifier fit.
    pub max_training_rows: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            eps: 0.1,
            nitrogen: CutoffTriple { c1: 25.0, c2: 50.0, c3: 100.0 },
            phosphorus: CutoffTriple { c1: 15.0, c2: 35.0, c3: 75.0 },
            potassium: CutoffTriple { c1: 60.0, c2: 130.0, c3: 250.0 },
            ph: PhBands {
                optimal_low: 6.0,
                optimal_high: 7.5,
                average_low: 5.5,
                average_high: 8.5,
            },
            poor_max_total: 5,
            average_max_total: 9,
            synthetic_per_class: 5_000,
            balance_cap: 100_000,
            max_training_rows: 200_000,
        }
    }
}

impl ScoringConfig {
    /// Load a configuration from JSON, falling back to defaults per field.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring config: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| "Failed to parse scoring config JSON")
    }
}
