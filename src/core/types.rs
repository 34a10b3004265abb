//! Core data types for the gradient-boosted regression tree trainer.
//!
//! Numeric aliases are kept in one place so that the tree engine, the
//! boosting loop and the data-access layer agree on precision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Floating-point type used for feature values, responses and predictions.
/// Split thresholds and impurity bookkeeping are carried in 64 bits.
pub type Score = f64;

/// Index of a feature column (split dimension).
pub type FeatureIndex = usize;

/// Index of a row (sample) in the training data.
pub type SampleIndex = usize;

/// Position of a rule inside a tree's rule sequence.
pub type RuleIndex = usize;

/// Boosting round counter.
pub type IterationIndex = usize;

/// Loss functions supported by the boosting loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    /// Squared error; trees fit the plain residual `y - F`.
    LeastSquares,
    /// Absolute error; trees fit `sign(y - F)` and leaves are refit to medians.
    LeastAbsoluteDeviation,
}

impl Default for LossType {
    fn default() -> Self {
        LossType::LeastSquares
    }
}

impl fmt::Display for LossType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LossType::LeastSquares => write!(f, "l2"),
            LossType::LeastAbsoluteDeviation => write!(f, "lad"),
        }
    }
}

impl std::str::FromStr for LossType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l2" | "ls" | "least_squares" | "regression" => Ok(LossType::LeastSquares),
            "l1" | "lad" | "least_absolute_deviation" => Ok(LossType::LeastAbsoluteDeviation),
            other => Err(format!("unknown loss '{}'", other)),
        }
    }
}
