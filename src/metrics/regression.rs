//! Regression evaluation metrics.

use crate::core::error::{GbrtError, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::fmt;

fn check_inputs(predictions: &ArrayView1<f64>, targets: &ArrayView1<f64>) -> Result<()> {
    if predictions.len() != targets.len() {
        return Err(GbrtError::dimension_mismatch(
            format!("{} predictions", targets.len()),
            format!("{} predictions", predictions.len()),
        ));
    }
    if targets.is_empty() {
        return Err(GbrtError::dataset("cannot evaluate metrics on empty input"));
    }
    Ok(())
}

/// Mean of squared prediction errors.
pub fn mean_squared_error(predictions: &ArrayView1<f64>, targets: &ArrayView1<f64>) -> Result<f64> {
    check_inputs(predictions, targets)?;
    let sum = predictions
        .iter()
        .zip(targets.iter())
        .map(|(&pred, &target)| (pred - target).powi(2))
        .sum::<f64>();
    Ok(sum / predictions.len() as f64)
}

/// Mean of absolute prediction errors.
pub fn mean_absolute_error(
    predictions: &ArrayView1<f64>,
    targets: &ArrayView1<f64>,
) -> Result<f64> {
    check_inputs(predictions, targets)?;
    let sum = predictions
        .iter()
        .zip(targets.iter())
        .map(|(&pred, &target)| (pred - target).abs())
        .sum::<f64>();
    Ok(sum / predictions.len() as f64)
}

/// Coefficient of determination.
///
/// A constant target has no variance to explain: the score is 1.0 when the
/// predictions are exact and 0.0 otherwise.
pub fn r_squared(predictions: &ArrayView1<f64>, targets: &ArrayView1<f64>) -> Result<f64> {
    check_inputs(predictions, targets)?;
    let target_mean = targets.sum() / targets.len() as f64;

    let ss_res = predictions
        .iter()
        .zip(targets.iter())
        .map(|(&pred, &target)| (target - pred).powi(2))
        .sum::<f64>();
    let ss_tot = targets
        .iter()
        .map(|&target| (target - target_mean).powi(2))
        .sum::<f64>();

    if ss_tot == 0.0 {
        Ok(if ss_res == 0.0 { 1.0 } else { 0.0 })
    } else {
        Ok(1.0 - ss_res / ss_tot)
    }
}

/// All regression metrics for one set of predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64,
}

impl RegressionMetrics {
    /// Evaluates every metric.
    pub fn calculate(predictions: &ArrayView1<f64>, targets: &ArrayView1<f64>) -> Result<Self> {
        let mse = mean_squared_error(predictions, targets)?;
        Ok(RegressionMetrics {
            mse,
            rmse: mse.sqrt(),
            mae: mean_absolute_error(predictions, targets)?,
            r_squared: r_squared(predictions, targets)?,
        })
    }
}

impl fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MSE: {:.6}, RMSE: {:.6}, MAE: {:.6}, R²: {:.6}",
            self.mse, self.rmse, self.mae, self.r_squared
        )
    }
}
