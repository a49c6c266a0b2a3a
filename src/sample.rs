//! Sample and Label Types
//!
//! A soil sample is four scalar measurements; potassium is a typed optional
//! because some historical datasets lack the K column entirely.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Agronomic plausibility bounds. Values are clipped to these ranges before
/// scoring or training; the scorer itself never rejects a value.
pub const N_RANGE: (f64, f64) = (0.0, 200.0);
pub const P_RANGE: (f64, f64) = (0.0, 200.0);
pub const K_RANGE: (f64, f64) = (0.0, 300.0);
pub const PH_RANGE: (f64, f64) = (0.0, 14.0);

/// One soil sample. N, P, K in mg/kg; pH unitless.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    pub n: f64,
    pub p: f64,
    /// Absent in some historical inputs; scored as "average" when missing.
    pub k: Option<f64>,
    pub ph: f64,
}

impl SoilSample {
    pub fn new(n: f64, p: f64, k: Option<f64>, ph: f64) -> Self {
        SoilSample { n, p, k, ph }
    }

    /// Clip to agronomic plausibility bounds. Callers clip before scoring;
    /// the scorer assumes nothing about its input range.
    pub fn clipped(self) -> Self {
        SoilSample {
            n: self.n.clamp(N_RANGE.0, N_RANGE.1),
            p: self.p.clamp(P_RANGE.0, P_RANGE.1),
            k: self.k.map(|v| v.clamp(K_RANGE.0, K_RANGE.1)),
            ph: self.ph.clamp(PH_RANGE.0, PH_RANGE.1),
        }
    }
}

/// Soil-health label, ordered by desirability (Poor < Average < Optimal).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum HealthLabel {
    Poor,
    Average,
    Optimal,
}

impl HealthLabel {
    pub const ALL: [HealthLabel; 3] =
        [HealthLabel::Poor, HealthLabel::Average, HealthLabel::Optimal];

    /// Stable class index used as the classifier target encoding.
    pub fn class_index(self) -> usize {
        match self {
            HealthLabel::Poor => 0,
            HealthLabel::Average => 1,
            HealthLabel::Optimal => 2,
        }
    }

    pub fn from_class_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthLabel::Poor => "Poor",
            HealthLabel::Average => "Average",
            HealthLabel::Optimal => "Optimal",
        }
    }
}

impl fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sample with its ground-truth label attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub sample: SoilSample,
    pub label: HealthLabel,
}
