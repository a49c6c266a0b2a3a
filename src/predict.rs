//! Inference Entry Point
//!
//! Loads the persisted classifier and the feature-order manifest, builds one
//! input vector in manifest order and returns the predicted label. Stateless
//! beyond the two read-only artifact loads; one invocation answers exactly
//! one request with either a label or a typed error.

use crate::meta::ModelMeta;
use crate::sample::HealthLabel;
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::Array2;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Inference failure taxonomy. Artifact problems fail the request fast (the
/// predictor never falls back to guessing); input problems are rejected
/// before the model is consulted.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Loaded classifier plus its feature-order contract.
#[derive(Debug)]
pub struct Predictor {
    model: DecisionTree<f64, usize>,
    meta: ModelMeta,
}

impl Predictor {
    /// Load both artifacts. A missing or corrupt model blob is fatal to the
    /// request; a missing manifest degrades to the canonical feature order.
    pub fn load(model_path: &Path, meta_path: &Path) -> Result<Self, PredictError> {
        let bytes = fs::read(model_path).map_err(|e| {
            PredictError::ModelUnavailable(format!("{}: {}", model_path.display(), e))
        })?;

        let model: DecisionTree<f64, usize> = bincode::deserialize(&bytes).map_err(|e| {
            PredictError::ModelUnavailable(format!(
                "failed to decode {}: {}",
                model_path.display(),
                e
            ))
        })?;

        let meta = ModelMeta::load_or_canonical(meta_path);

        Ok(Predictor { model, meta })
    }

    /// Assemble a predictor from in-memory parts (training-side reuse, tests).
    pub fn from_parts(model: DecisionTree<f64, usize>, meta: ModelMeta) -> Self {
        Predictor { model, meta }
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    /// Predict the label for one sample given in logical order (N, P, K, pH).
    pub fn predict(&self, n: f64, p: f64, k: f64, ph: f64) -> Result<HealthLabel, PredictError> {
        let vector = self.meta.vector_for(n, p, k, ph);
        let features = Array2::from_shape_vec((1, vector.len()), vector)
            .map_err(|e| PredictError::InvalidInput(e.to_string()))?;

        let prediction = self.model.predict(&features);
        let class = prediction[0];

        HealthLabel::from_class_index(class).ok_or_else(|| {
            PredictError::ModelUnavailable(format!("model produced unknown class index {}", class))
        })
    }
}

/// Parse one CLI input as a real number, naming the offending field.
pub fn parse_input(raw: &str, name: &str) -> Result<f64, PredictError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| PredictError::InvalidInput(format!("{} value '{}' is not a number", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_model_is_model_unavailable() {
        let err = Predictor::load(
            &PathBuf::from("/nonexistent/soil_model.bin"),
            &PathBuf::from("/nonexistent/model_meta.json"),
        )
        .unwrap_err();
        assert!(matches!(err, PredictError::ModelUnavailable(_)));
    }

    #[test]
    fn test_corrupt_model_is_model_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("soil_model.bin");
        std::fs::write(&model_path, b"definitely not bincode").unwrap();

        let err = Predictor::load(&model_path, &dir.path().join("model_meta.json")).unwrap_err();
        assert!(matches!(err, PredictError::ModelUnavailable(_)));
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("6.5", "pH").unwrap(), 6.5);
        assert_eq!(parse_input(" 42 ", "N").unwrap(), 42.0);
        let err = parse_input("abc", "K").unwrap_err();
        assert!(matches!(err, PredictError::InvalidInput(_)));
        assert!(err.to_string().contains("K"));
    }
}
