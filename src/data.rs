//! Raw Dataset Loading
//!
//! Reads the tabular survey input (columns N, P, pH and optionally K) with
//! Polars. Row-level problems are recovered, never fatal: values that fail
//! numeric coercion become nulls, and rows missing an essential field (N, P
//! or pH) are dropped before labeling. All surviving values are clipped to
//! agronomic plausibility bounds.

use crate::sample::SoilSample;
use anyhow::{Context, Result};
use polars::prelude::*;

/// Load soil samples from a CSV file.
pub fn load_samples(path: &str) -> Result<Vec<SoilSample>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {}", path))?
        .finish()
        .with_context(|| format!("Failed to load dataset CSV: {}", path))?;

    samples_from_dataframe(&df)
}

/// Extract clipped samples from a DataFrame, dropping rows whose essential
/// fields are null after coercion.
pub fn samples_from_dataframe(df: &DataFrame) -> Result<Vec<SoilSample>> {
    let n = numeric_column(df, "N")?;
    let p = numeric_column(df, "P")?;
    let ph = numeric_column(df, "pH")?;
    // K column may be absent from historical exports entirely
    let k = if df.get_column_names().iter().any(|c| c.as_str() == "K") {
        Some(numeric_column(df, "K")?)
    } else {
        None
    };

    let mut samples = Vec::with_capacity(df.height());
    let mut dropped = 0usize;

    for idx in 0..df.height() {
        match (n[idx], p[idx], ph[idx]) {
            (Some(n_val), Some(p_val), Some(ph_val)) => {
                let k_val = k.as_ref().and_then(|col| col[idx]);
                samples.push(SoilSample::new(n_val, p_val, k_val, ph_val).clipped());
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        println!("Dropped {} rows missing essential fields (N, P or pH)", dropped);
    }

    Ok(samples)
}

/// Coerce a column to f64; unparseable entries become nulls.
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' cannot be coerced to numeric", name))?;

    let values = col
        .f64()
        .with_context(|| format!("Column '{}' is not float after cast", name))?;

    Ok(values.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn df_from_csv(csv: &str) -> DataFrame {
        use std::io::Cursor;
        CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(csv))
            .finish()
            .unwrap()
    }

    #[test]
    fn test_rows_with_missing_essentials_dropped() {
        let df = df_from_csv(
            "N,P,K,pH\n\
             30,20,80,6.5\n\
             ,20,80,6.5\n\
             30,,80,6.5\n\
             30,20,80,\n\
             30,20,,6.5\n",
        );
        let samples = samples_from_dataframe(&df).unwrap();
        // Missing K survives; missing N, P or pH does not
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].k, Some(80.0));
        assert_eq!(samples[1].k, None);
    }

    #[test]
    fn test_unparseable_values_coerce_to_null() {
        let df = df_from_csv(
            "N,P,K,pH\n\
             30,20,80,6.5\n\
             not_a_number,20,80,6.5\n",
        );
        let samples = samples_from_dataframe(&df).unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_absent_k_column() {
        let df = df_from_csv("N,P,pH\n30,20,6.5\n");
        let samples = samples_from_dataframe(&df).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].k, None);
    }

    #[test]
    fn test_values_clipped_on_load() {
        let df = df_from_csv("N,P,K,pH\n500,-3,999,15\n");
        let samples = samples_from_dataframe(&df).unwrap();
        assert_eq!(samples[0].n, 200.0);
        assert_eq!(samples[0].p, 0.0);
        assert_eq!(samples[0].k, Some(300.0));
        assert_eq!(samples[0].ph, 14.0);
    }
}
