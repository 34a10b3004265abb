//! Validated training data for the boosting trainer.
//!
//! [`TrainingData`] copies predictors into column-major storage once, so the
//! split search can sort and sweep a feature without going back through the
//! caller's container.

use crate::core::error::{GbrtError, Result};
use crate::core::types::{FeatureIndex, SampleIndex};
use crate::dataset::frame::TabularData;

/// Immutable, validated predictor columns plus one response column.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingData {
    features: Vec<Vec<f64>>,
    response: Vec<f64>,
}

impl TrainingData {
    /// Validates and copies predictors and a one-column response.
    ///
    /// Fails when there are no rows or no predictor columns, when the
    /// response does not have exactly one column, when row counts differ,
    /// or when any value is not finite.
    pub fn from_frames<X, Y>(predictors: &X, responses: &Y) -> Result<Self>
    where
        X: TabularData + ?Sized,
        Y: TabularData + ?Sized,
    {
        if responses.num_columns() != 1 {
            return Err(GbrtError::dimension_mismatch(
                "1 response column",
                format!("{} response columns", responses.num_columns()),
            ));
        }

        let features = (0..predictors.num_columns())
            .map(|col| predictors.column(col))
            .collect();
        Self::new(features, responses.column(0))
    }

    /// Validates column-major predictors and a response vector.
    pub fn new(features: Vec<Vec<f64>>, response: Vec<f64>) -> Result<Self> {
        let num_rows = response.len();
        crate::ensure!(num_rows > 0, GbrtError::dataset("training data has zero rows"));
        crate::ensure!(
            !features.is_empty(),
            GbrtError::dataset("training data has no predictor columns")
        );

        for (col, column) in features.iter().enumerate() {
            if column.len() != num_rows {
                return Err(GbrtError::dimension_mismatch(
                    format!("{} rows (response)", num_rows),
                    format!("{} rows in predictor column {}", column.len(), col),
                ));
            }
            if let Some(row) = column.iter().position(|v| !v.is_finite()) {
                return Err(GbrtError::dataset(format!(
                    "non-finite predictor value {} at row {}, column {}",
                    column[row], row, col
                )));
            }
        }

        if let Some(row) = response.iter().position(|v| !v.is_finite()) {
            return Err(GbrtError::dataset(format!(
                "non-finite response value {} at row {}",
                response[row], row
            )));
        }

        Ok(TrainingData { features, response })
    }

    /// Number of samples.
    pub fn num_rows(&self) -> usize {
        self.response.len()
    }

    /// Number of predictor columns.
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// One predictor column.
    pub fn feature(&self, dimension: FeatureIndex) -> &[f64] {
        &self.features[dimension]
    }

    /// Predictor value of one sample.
    pub fn feature_value(&self, sample: SampleIndex, dimension: FeatureIndex) -> f64 {
        self.features[dimension][sample]
    }

    /// The response column.
    pub fn response(&self) -> &[f64] {
        &self.response
    }
}

impl TabularData for TrainingData {
    fn num_rows(&self) -> usize {
        self.response.len()
    }

    fn num_columns(&self) -> usize {
        self.features.len()
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        self.features[col][row]
    }

    fn column(&self, col: usize) -> Vec<f64> {
        self.features[col].clone()
    }
}
