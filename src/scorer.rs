//! Threshold Scorer and Label Aggregator
//!
//! Maps raw measurements to ordinal sub-scores (1-4 for nutrients, 1-3 for
//! pH) against the configured cutoff table, then sums the four sub-scores
//! into a composite index and cuts it into the final label. This rule is the
//! ground truth used both to label training data and to judge the trained
//! classifier.
//!
//! Every cutoff comparison subtracts the configured buffer `eps` first, so a
//! value sitting exactly on a guideline boundary (e.g. N = 25) lands in the
//! higher category instead of falling just short from floating-point noise.

use crate::config::ScoringConfig;
use crate::sample::{HealthLabel, LabeledSample, SoilSample};

/// Sub-score assigned when a measurement is absent (treated as "average").
pub const MISSING_SUB_SCORE: u8 = 2;

/// Nutrient kind selecting a cutoff triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

/// Sub-scores for one sample, in feature order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubScores {
    pub n: u8,
    pub p: u8,
    pub k: u8,
    pub ph: u8,
}

impl SubScores {
    /// Composite index: sum of the four sub-scores, range [4, 15] under the
    /// canonical table.
    pub fn total(self) -> u8 {
        self.n + self.p + self.k + self.ph
    }
}

/// Deterministic scoring-and-labeling rule.
#[derive(Debug, Clone)]
pub struct ThresholdScorer {
    config: ScoringConfig,
}

impl Default for ThresholdScorer {
    fn default() -> Self {
        ThresholdScorer::new(ScoringConfig::default())
    }
}

impl ThresholdScorer {
    pub fn new(config: ScoringConfig) -> Self {
        ThresholdScorer { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one nutrient measurement against its buffered cutoff ladder.
    ///
    /// `None` always scores [`MISSING_SUB_SCORE`]; in practice only K is ever
    /// absent (rows missing N or P are dropped before labeling). The scorer
    /// has no invalid outcome: callers clip to agronomic bounds beforehand,
    /// but any real value still maps to a defined sub-score.
    pub fn score_nutrient(&self, value: Option<f64>, nutrient: Nutrient) -> u8 {
        let Some(v) = value else {
            return MISSING_SUB_SCORE;
        };

        let cutoffs = match nutrient {
            Nutrient::Nitrogen => self.config.nitrogen,
            Nutrient::Phosphorus => self.config.phosphorus,
            Nutrient::Potassium => self.config.potassium,
        };
        let eps = self.config.eps;

        if v < cutoffs.c1 - eps {
            1
        } else if v < cutoffs.c2 - eps {
            2
        } else if v < cutoffs.c3 - eps {
            3
        } else {
            4
        }
    }

    /// Score pH against the buffered non-monotonic banding: optimal in the
    /// middle, average on the shoulders, poor when strongly acidic or
    /// strongly alkaline.
    pub fn score_ph(&self, value: f64) -> u8 {
        let bands = self.config.ph;
        let eps = self.config.eps;

        if (bands.optimal_low - eps..=bands.optimal_high + eps).contains(&value) {
            3
        } else if (bands.average_low - eps..bands.optimal_low - eps).contains(&value)
            || (value > bands.optimal_high + eps && value <= bands.average_high + eps)
        {
            2
        } else {
            1
        }
    }

    /// All four sub-scores for one sample.
    pub fn sub_scores(&self, sample: &SoilSample) -> SubScores {
        SubScores {
            n: self.score_nutrient(Some(sample.n), Nutrient::Nitrogen),
            p: self.score_nutrient(Some(sample.p), Nutrient::Phosphorus),
            k: self.score_nutrient(sample.k, Nutrient::Potassium),
            ph: self.score_ph(sample.ph),
        }
    }

    /// Cut the composite index into the final label.
    ///
    /// Pure and monotonic: raising any sub-score never lowers the label.
    pub fn aggregate(&self, scores: SubScores) -> HealthLabel {
        let total = scores.total();
        if total <= self.config.poor_max_total {
            HealthLabel::Poor
        } else if total <= self.config.average_max_total {
            HealthLabel::Average
        } else {
            HealthLabel::Optimal
        }
    }

    /// Full rule for one sample: clip, score, aggregate.
    pub fn label_sample(&self, sample: &SoilSample) -> HealthLabel {
        self.aggregate(self.sub_scores(&sample.clipped()))
    }

    /// Attach the ground-truth label to a sample.
    pub fn label(&self, sample: SoilSample) -> LabeledSample {
        LabeledSample {
            label: self.label_sample(&sample),
            sample,
        }
    }
}
