//! Dataset Synthesis and Class Balancing
//!
//! Real soil surveys are heavily skewed: whole labels can be missing and the
//! remainder is rarely uniform. This module fills absent classes with
//! class-conditional uniform draws and then resamples every class to a common
//! target count so the classifier never trains on a degenerate distribution.
//!
//! All randomness flows through a caller-supplied `Rng`, so pipelines seed a
//! `StdRng` once and synthetic output is reproducible run-to-run.

use crate::config::ScoringConfig;
use crate::sample::{HealthLabel, LabeledSample, SoilSample};
use crate::scorer::ThresholdScorer;
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;

/// Floor of the synthetic acidic pH draws and ceiling of the alkaline ones.
/// Well inside the "poor" bands; drawing from the full [0, 14] range would
/// produce agronomically absurd samples.
const SYNTH_PH_FLOOR: f64 = 3.0;
const SYNTH_PH_CEIL: f64 = 9.5;

/// Class-conditional synthetic generation and proportional resampling.
#[derive(Debug, Clone)]
pub struct DatasetSynthesizer {
    scorer: ThresholdScorer,
}

impl Default for DatasetSynthesizer {
    fn default() -> Self {
        DatasetSynthesizer::new(ScoringConfig::default())
    }
}

impl DatasetSynthesizer {
    pub fn new(config: ScoringConfig) -> Self {
        DatasetSynthesizer {
            scorer: ThresholdScorer::new(config),
        }
    }

    fn config(&self) -> &ScoringConfig {
        self.scorer.config()
    }

    /// Draw one sample whose features are uniform over sub-ranges that sum
    /// to the requested label under the scoring rule.
    ///
    /// Poor draws sit below every buffered first cutoff with out-of-band pH;
    /// Average draws sit in each second band with shoulder pH; Optimal draws
    /// sit in each third band with in-band pH. The per-feature ranges come
    /// from the configured table, so alternate tables synthesize correctly.
    fn draw_sample<R: Rng + ?Sized>(&self, label: HealthLabel, rng: &mut R) -> SoilSample {
        let cfg = self.config();
        let eps = cfg.eps;

        match label {
            HealthLabel::Poor => {
                let ph = if rng.gen_bool(0.5) {
                    rng.gen_range(SYNTH_PH_FLOOR..cfg.ph.average_low - eps)
                } else {
                    rng.gen_range(cfg.ph.average_high + eps..SYNTH_PH_CEIL)
                };
                SoilSample::new(
                    rng.gen_range(0.0..cfg.nitrogen.c1 - eps),
                    rng.gen_range(0.0..cfg.phosphorus.c1 - eps),
                    Some(rng.gen_range(0.0..cfg.potassium.c1 - eps)),
                    ph,
                )
            }
            HealthLabel::Average => {
                let ph = if rng.gen_bool(0.5) {
                    rng.gen_range(cfg.ph.average_low..cfg.ph.optimal_low - eps)
                } else {
                    rng.gen_range(cfg.ph.optimal_high + eps..cfg.ph.average_high)
                };
                SoilSample::new(
                    rng.gen_range(cfg.nitrogen.c1..cfg.nitrogen.c2 - eps),
                    rng.gen_range(cfg.phosphorus.c1..cfg.phosphorus.c2 - eps),
                    Some(rng.gen_range(cfg.potassium.c1..cfg.potassium.c2 - eps)),
                    ph,
                )
            }
            HealthLabel::Optimal => SoilSample::new(
                rng.gen_range(cfg.nitrogen.c2 + eps..cfg.nitrogen.c3),
                rng.gen_range(cfg.phosphorus.c2 + eps..cfg.phosphorus.c3),
                Some(rng.gen_range(cfg.potassium.c2 + eps..cfg.potassium.c3)),
                rng.gen_range(cfg.ph.optimal_low..cfg.ph.optimal_high),
            ),
        }
    }

    /// Generate `count` synthetic samples that label into `label`.
    pub fn synthesize_class<R: Rng + ?Sized>(
        &self,
        label: HealthLabel,
        count: usize,
        rng: &mut R,
    ) -> Vec<LabeledSample> {
        (0..count)
            .map(|_| LabeledSample {
                sample: self.draw_sample(label, rng),
                label,
            })
            .collect()
    }

    /// Fill any label class with zero members with synthetic samples.
    ///
    /// Recovers silently: an absent class is an expected property of skewed
    /// survey data, not an operator-facing failure.
    pub fn ensure_all_classes_present<R: Rng + ?Sized>(
        &self,
        mut samples: Vec<LabeledSample>,
        rng: &mut R,
    ) -> Vec<LabeledSample> {
        let counts = class_counts(&samples);
        let per_class = self.config().synthetic_per_class;

        for label in HealthLabel::ALL {
            if counts.get(&label).copied().unwrap_or(0) == 0 {
                println!(
                    "No '{}' samples found; generating {} synthetic '{}' samples...",
                    label, per_class, label
                );
                samples.extend(self.synthesize_class(label, per_class, rng));
            }
        }

        samples
    }

    /// Build a fully synthetic, already-balanced dataset: `n_per_class`
    /// samples for each of the three labels, globally shuffled. Used by the
    /// quick training path when no survey CSV is supplied.
    pub fn synthesize_balanced<R: Rng + ?Sized>(
        &self,
        n_per_class: usize,
        rng: &mut R,
    ) -> Vec<LabeledSample> {
        let mut samples = Vec::with_capacity(n_per_class * HealthLabel::ALL.len());
        for label in HealthLabel::ALL {
            samples.extend(self.synthesize_class(label, n_per_class, rng));
        }
        samples.shuffle(rng);
        samples
    }

    /// Resample every class to a common target count.
    ///
    /// Target = min(total / distinct classes, configured cap). Classes below
    /// target are upsampled with replacement (duplication is acceptable: the
    /// goal is frequency balance, not information gain); classes at or above
    /// target are downsampled without replacement. Output is globally
    /// shuffled so a naive head/tail split is not class-skewed.
    pub fn balance_classes<R: Rng + ?Sized>(
        &self,
        samples: Vec<LabeledSample>,
        rng: &mut R,
    ) -> Vec<LabeledSample> {
        let total = samples.len();
        if total == 0 {
            return samples;
        }

        let mut by_class: FxHashMap<HealthLabel, Vec<LabeledSample>> = FxHashMap::default();
        for s in samples {
            by_class.entry(s.label).or_default().push(s);
        }

        let n_classes = by_class.len();
        let target = (total / n_classes).min(self.config().balance_cap);

        let mut balanced = Vec::with_capacity(target * n_classes);
        // Fixed label order keeps the draw sequence reproducible for a seed.
        for label in HealthLabel::ALL {
            let Some(mut class) = by_class.remove(&label) else {
                continue;
            };
            if class.len() < target {
                balanced.extend((0..target).map(|_| class[rng.gen_range(0..class.len())]));
            } else {
                class.shuffle(rng);
                class.truncate(target);
                balanced.extend(class);
            }
        }

        balanced.shuffle(rng);
        balanced
    }
}

/// Count samples per label.
pub fn class_counts(samples: &[LabeledSample]) -> FxHashMap<HealthLabel, usize> {
    let mut counts = FxHashMap::default();
    for s in samples {
        *counts.entry(s.label).or_insert(0) += 1;
    }
    counts
}

/// One-line class distribution for operator output, in label order.
pub fn format_distribution(samples: &[LabeledSample]) -> String {
    let counts = class_counts(samples);
    HealthLabel::ALL
        .iter()
        .map(|l| format!("{}: {}", l, counts.get(l).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join(", ")
}
