//! Loss functions driving the boosting loop.
//!
//! Each round fits a tree to the negative gradient of the loss at the
//! current ensemble prediction. Losses whose optimal leaf value is not the
//! mean gradient refit the leaves after the tree has been grown.

use crate::core::error::{GbrtError, Result};
use crate::core::types::{LossType, Score};
use crate::dataset::TrainingData;
use crate::tree::RegressionTree;
use std::collections::HashMap;
use std::fmt::Debug;

/// A differentiable regression loss.
pub trait LossFunction: Send + Sync + Debug {
    /// Loss name, as accepted by `LossType::from_str`.
    fn name(&self) -> &'static str;

    fn loss_type(&self) -> LossType;

    /// Constant prediction minimizing the loss over `response`.
    fn initial_prediction(&self, response: &[f64]) -> Score;

    /// Writes `-dL/dF` for every sample into `residuals`.
    fn negative_gradient(
        &self,
        response: &[f64],
        predictions: &[Score],
        residuals: &mut [f64],
    ) -> Result<()>;

    /// Mean training loss at `predictions`.
    fn loss(&self, response: &[f64], predictions: &[Score]) -> f64;

    /// Adjusts a freshly grown tree's leaf values. The default keeps the
    /// mean negative gradient computed by the tree builder.
    fn refit_leaves(
        &self,
        _tree: &mut RegressionTree,
        _data: &TrainingData,
        _predictions: &[Score],
    ) -> Result<()> {
        Ok(())
    }
}

fn check_lengths(response: &[f64], predictions: &[Score], residuals: &[f64]) -> Result<()> {
    if response.len() != predictions.len() || residuals.len() != response.len() {
        return Err(GbrtError::dimension_mismatch(
            format!("{} predictions and residuals", response.len()),
            format!(
                "predictions: {}, residuals: {}",
                predictions.len(),
                residuals.len()
            ),
        ));
    }
    Ok(())
}

/// Squared error. Trees fit the plain residual `y - F`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquaresLoss;

impl LossFunction for LeastSquaresLoss {
    fn name(&self) -> &'static str {
        "l2"
    }

    fn loss_type(&self) -> LossType {
        LossType::LeastSquares
    }

    fn initial_prediction(&self, response: &[f64]) -> Score {
        if response.is_empty() {
            return 0.0;
        }
        response.iter().sum::<f64>() / response.len() as f64
    }

    fn negative_gradient(
        &self,
        response: &[f64],
        predictions: &[Score],
        residuals: &mut [f64],
    ) -> Result<()> {
        check_lengths(response, predictions, residuals)?;
        for ((residual, &y), &f) in residuals.iter_mut().zip(response).zip(predictions) {
            *residual = y - f;
        }
        Ok(())
    }

    /// Half the mean squared error.
    fn loss(&self, response: &[f64], predictions: &[Score]) -> f64 {
        if response.is_empty() {
            return 0.0;
        }
        let sum: f64 = response
            .iter()
            .zip(predictions)
            .map(|(&y, &f)| (y - f) * (y - f))
            .sum();
        0.5 * sum / response.len() as f64
    }
}

/// Absolute error. Trees fit `sign(y - F)`; leaves are refit to the median
/// residual of the samples they receive.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastAbsoluteDeviationLoss;

impl LossFunction for LeastAbsoluteDeviationLoss {
    fn name(&self) -> &'static str {
        "lad"
    }

    fn loss_type(&self) -> LossType {
        LossType::LeastAbsoluteDeviation
    }

    fn initial_prediction(&self, response: &[f64]) -> Score {
        median(response.to_vec())
    }

    fn negative_gradient(
        &self,
        response: &[f64],
        predictions: &[Score],
        residuals: &mut [f64],
    ) -> Result<()> {
        check_lengths(response, predictions, residuals)?;
        for ((residual, &y), &f) in residuals.iter_mut().zip(response).zip(predictions) {
            let diff = y - f;
            *residual = if diff > 0.0 {
                1.0
            } else if diff < 0.0 {
                -1.0
            } else {
                0.0
            };
        }
        Ok(())
    }

    fn loss(&self, response: &[f64], predictions: &[Score]) -> f64 {
        if response.is_empty() {
            return 0.0;
        }
        let sum: f64 = response
            .iter()
            .zip(predictions)
            .map(|(&y, &f)| (y - f).abs())
            .sum();
        sum / response.len() as f64
    }

    fn refit_leaves(
        &self,
        tree: &mut RegressionTree,
        data: &TrainingData,
        predictions: &[Score],
    ) -> Result<()> {
        let response = data.response();
        let mut per_leaf: HashMap<usize, Vec<f64>> = HashMap::new();
        for sample in 0..data.num_rows() {
            let leaf = tree.route(|dimension| data.feature_value(sample, dimension));
            per_leaf
                .entry(leaf)
                .or_default()
                .push(response[sample] - predictions[sample]);
        }

        // Sorted so refits happen in a fixed order.
        let mut leaves: Vec<_> = per_leaf.into_iter().collect();
        leaves.sort_by_key(|(leaf, _)| *leaf);
        for (leaf, residuals) in leaves {
            tree.set_leaf_value(leaf, median(residuals))?;
        }
        Ok(())
    }
}

/// Median of `values`; the mean of the two middle values for even counts.
pub fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Factory for the loss selected by `loss_type`.
pub fn create_loss_function(loss_type: LossType) -> Box<dyn LossFunction> {
    match loss_type {
        LossType::LeastSquares => Box::new(LeastSquaresLoss),
        LossType::LeastAbsoluteDeviation => Box::new(LeastAbsoluteDeviationLoss),
    }
}
