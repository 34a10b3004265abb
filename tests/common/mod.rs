//! Common test utilities for gbrt-rust integration tests.

#![allow(dead_code)]

use gbrt_rust::ColumnFrame;
use rand::prelude::*;

/// Deterministic table of roughly `megabytes` of `f64` cells.
///
/// Column `c` holds `row % (c + 2)`, so every column is a small-cardinality
/// periodic signal and the last one can serve as a response.
pub fn generate_data(megabytes: f64, num_columns: usize) -> ColumnFrame {
    let num_rows = (megabytes * 1024.0 * 1024.0 / 8.0 / (num_columns + 1) as f64) as usize;
    let columns = (0..num_columns)
        .map(|c| (0..num_rows).map(|row| (row % (c + 2)) as f64).collect())
        .collect();
    ColumnFrame::new(columns).expect("generated columns share a row count")
}

/// Seeded random predictors with a noisy nonlinear response.
pub fn random_regression(num_rows: usize, num_features: usize, seed: u64) -> (ColumnFrame, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let columns: Vec<Vec<f64>> = (0..num_features)
        .map(|_| (0..num_rows).map(|_| rng.gen_range(-5.0..5.0)).collect())
        .collect();
    let response = (0..num_rows)
        .map(|row| {
            let x0 = columns[0][row];
            let x1 = columns.get(1).map_or(0.0, |c| c[row]);
            let signal = if x0 > 0.0 { 3.0 } else { -1.0 } + 0.5 * x1;
            signal + rng.gen_range(-0.1..0.1)
        })
        .collect();
    (ColumnFrame::new(columns).expect("random columns share a row count"), response)
}

/// Mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
