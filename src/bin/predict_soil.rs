//! Single-Sample Soil-Health Prediction
//!
//! Takes four positional values (N, P, K, pH), loads the persisted
//! classifier and feature-order manifest, and emits machine-readable JSON:
//! `{"prediction": "<label>"}` on stdout on success, `{"error": "..."}` on
//! stderr with a nonzero exit status on failure, so a calling process can
//! branch without parsing prose.
//!
//! Usage:
//!   predict_soil <N> <P> <K> <pH>

use serde_json::json;
use soil_scorer_rust::predict::{parse_input, PredictError, Predictor};
use soil_scorer_rust::HealthLabel;
use std::path::Path;
use std::process::ExitCode;

const MODEL_PATH: &str = "soil_model.bin";
const META_PATH: &str = "model_meta.json";

fn main() -> ExitCode {
    match run() {
        Ok(label) => {
            println!("{}", json!({ "prediction": label.to_string() }));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", json!({ "error": err.to_string() }));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<HealthLabel, PredictError> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 5 {
        return Err(PredictError::InvalidInput(
            "expected four values: N P K pH".to_string(),
        ));
    }

    let n = parse_input(&args[1], "N")?;
    let p = parse_input(&args[2], "P")?;
    let k = parse_input(&args[3], "K")?;
    let ph = parse_input(&args[4], "pH")?;

    let predictor = Predictor::load(Path::new(MODEL_PATH), Path::new(META_PATH))?;
    predictor.predict(n, p, k, ph)
}
