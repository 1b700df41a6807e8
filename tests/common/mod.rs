//! Common test utilities for rust-featurizers.
//!
//! Float comparison that treats NaN as a value, JSON fixture loading, and
//! deterministic grain data generation.

#![allow(dead_code)]

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Compare floats with a relative tolerance; NaN only equals NaN.
///
/// Values near zero (|expected| < 1e-10) are compared absolutely.
pub fn assert_float_eq(actual: f64, expected: f64, epsilon: f64, context: &str) {
    if expected.is_nan() || actual.is_nan() {
        assert!(
            expected.is_nan() && actual.is_nan(),
            "{context}: expected {expected} but got {actual}"
        );
        return;
    }

    let diff = (actual - expected).abs();
    let scale = if expected.abs() < 1e-10 { 1.0 } else { expected.abs() };
    assert!(
        diff / scale < epsilon,
        "{context}: expected {expected} but got {actual} (diff: {diff:.2e})"
    );
}

/// Assert two output columns are equal with tolerance.
pub fn assert_series_eq(actual: &[f64], expected: &[f64], epsilon: f64, name: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{name}: length mismatch: {} vs {}",
        actual.len(),
        expected.len()
    );

    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        assert_float_eq(a, e, epsilon, &format!("{name}[{i}]"));
    }
}

/// Rows of a grain-keyed series, with nulls as NaN.
#[derive(Debug, Clone, Default)]
pub struct GrainFixture {
    /// One grain key per row.
    pub grains: Vec<Vec<String>>,
    /// One value per row.
    pub values: Vec<f64>,
    /// Expected outputs keyed by featurizer name.
    pub expected: std::collections::HashMap<String, Vec<f64>>,
}

impl GrainFixture {
    /// Load a fixture from JSON:
    /// `{"grains": [[..]], "values": [..], "expected": {"name": [..]}}`.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let reader = BufReader::new(File::open(path)?);
        let data: serde_json::Value = serde_json::from_reader(reader)?;

        let grains = match data.get("grains") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Vec::new(),
        };

        let mut fixture = GrainFixture {
            grains,
            values: parse_array(data.get("values"))?,
            ..GrainFixture::default()
        };

        if let Some(expected) = data.get("expected").and_then(|e| e.as_object()) {
            for (key, value) in expected {
                fixture.expected.insert(key.clone(), parse_array(Some(value))?);
            }
        }

        Ok(fixture)
    }

    /// Path of a fixture under `tests/data`.
    pub fn path(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
    }
}

fn parse_array(value: Option<&serde_json::Value>) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    match value {
        Some(serde_json::Value::Array(arr)) => arr
            .iter()
            .map(|v| {
                if v.is_null() {
                    Ok(f64::NAN)
                } else {
                    v.as_f64().ok_or_else(|| format!("Invalid number: {v:?}").into())
                }
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

// ============================================================================
// Synthetic Data Generators
// ============================================================================

/// Interleave `rows_per_grain[i]` rows for grain `g{i}`, with roughly
/// `null_ratio` of the values set to NaN. Deterministic in `seed`.
pub fn generate_grain_rows(rows_per_grain: &[usize], null_ratio: f64, seed: u64) -> GrainFixture {
    let mut state = seed;
    let mut next_unit = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    let mut remaining = rows_per_grain.to_vec();
    let mut fixture = GrainFixture::default();
    while remaining.iter().any(|&r| r > 0) {
        for (i, rows) in remaining.iter_mut().enumerate() {
            if *rows == 0 {
                continue;
            }
            *rows -= 1;
            let value = if next_unit() < null_ratio {
                f64::NAN
            } else {
                (next_unit() * 200.0 - 100.0).round()
            };
            fixture.grains.push(vec![format!("g{i}")]);
            fixture.values.push(value);
        }
    }
    fixture
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_float_eq_nan() {
        assert_float_eq(f64::NAN, f64::NAN, 1e-10, "test");
        assert_float_eq(0.0, 1e-12, 1e-10, "test");
    }

    #[test]
    #[should_panic]
    fn test_assert_float_eq_nan_mismatch() {
        assert_float_eq(1.0, f64::NAN, 1e-10, "test");
    }

    #[test]
    fn test_generate_grain_rows() {
        let data = generate_grain_rows(&[3, 1, 2], 0.0, 7);
        assert_eq!(data.values.len(), 6);
        assert_eq!(data.grains[..3], [vec!["g0".to_string()], vec!["g1".to_string()], vec!["g2".to_string()]]);
        assert!(data.values.iter().all(|v| !v.is_nan()));

        let again = generate_grain_rows(&[3, 1, 2], 0.0, 7);
        assert_eq!(data.values, again.values);
    }
}
