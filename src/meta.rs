//! Feature-Order Manifest
//!
//! The ordered feature-name list is the binding contract between the columns
//! the classifier was fit on and the vector built at inference time. It is
//! written once per training run (atomically: temp file + rename) and read
//! back before every prediction; retraining with a reordered feature set can
//! therefore never silently corrupt predictions.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Canonical feature order, used at training time and as the inference
/// fallback when the manifest is unavailable.
pub const CANONICAL_FEATURES: [&str; 4] = ["N", "P", "K", "pH"];

/// Persisted `{"features": [...]}` manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub features: Vec<String>,
}

impl Default for ModelMeta {
    fn default() -> Self {
        ModelMeta::canonical()
    }
}

impl ModelMeta {
    pub fn canonical() -> Self {
        ModelMeta {
            features: CANONICAL_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Write the manifest atomically: serialize to a sibling temp file, then
    /// rename into place so readers never observe a partial write.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self).context("Failed to serialize model meta")?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write model meta temp file: {:?}", tmp))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to move model meta into place: {:?}", path))?;

        Ok(())
    }

    /// Load and validate a manifest. Errors if the file is unreadable or the
    /// feature list is not a permutation of the canonical four names.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model meta: {:?}", path))?;

        let meta: ModelMeta =
            serde_json::from_str(&contents).context("Failed to parse model meta JSON")?;
        meta.validate()?;

        Ok(meta)
    }

    /// Load with the soft-fail contract: a missing or invalid manifest
    /// degrades to the canonical order with a warning, never a crash.
    pub fn load_or_canonical(path: &Path) -> Self {
        match Self::load(path) {
            Ok(meta) => meta,
            Err(err) => {
                eprintln!(
                    "warning: {:#}; falling back to canonical feature order {:?}",
                    err, CANONICAL_FEATURES
                );
                ModelMeta::canonical()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.features.len() != CANONICAL_FEATURES.len() {
            bail!(
                "Model meta lists {} features, expected {}",
                self.features.len(),
                CANONICAL_FEATURES.len()
            );
        }
        for name in CANONICAL_FEATURES {
            if !self.features.iter().any(|f| f == name) {
                bail!("Model meta is missing feature '{}'", name);
            }
        }
        Ok(())
    }

    /// Build the model input vector by feature name, never literal position.
    pub fn vector_for(&self, n: f64, p: f64, k: f64, ph: f64) -> Vec<f64> {
        self.features
            .iter()
            .map(|f| match f.as_str() {
                "N" => n,
                "P" => p,
                "K" => k,
                "pH" => ph,
                // Unreachable for a validated manifest
                _ => f64::NAN,
            })
            .collect()
    }
}
