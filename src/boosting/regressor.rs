//! Fitted gradient-boosted regressor.

use crate::boosting::ensemble::AdditiveRegressionTree;
use crate::config::Config;
use crate::core::error::{GbrtError, Result};
use crate::core::types::Score;
use crate::dataset::TabularData;
use crate::metrics::r_squared;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A trained model: the additive ensemble plus what was recorded while fitting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedRegressor {
    model: AdditiveRegressionTree,
    training_history: Vec<f64>,
    config: Config,
}

impl GradientBoostedRegressor {
    pub(crate) fn new(
        model: AdditiveRegressionTree,
        training_history: Vec<f64>,
        config: Config,
    ) -> Self {
        GradientBoostedRegressor {
            model,
            training_history,
            config,
        }
    }

    /// The fitted ensemble, for prediction or rule inspection.
    pub fn additive_regression_tree(&self) -> &AdditiveRegressionTree {
        &self.model
    }

    pub fn into_additive_regression_tree(self) -> AdditiveRegressionTree {
        self.model
    }

    /// Configuration the model was fitted with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mean training loss after each completed round.
    pub fn training_history(&self) -> &[f64] {
        &self.training_history
    }

    pub fn predict<X: TabularData + ?Sized>(&self, x: &X) -> Result<Array1<Score>> {
        self.model.predict(x)
    }

    pub fn predict_row(&self, row: &[f64]) -> Result<Score> {
        self.model.predict_row(row)
    }

    /// Predictions after each round.
    pub fn staged_predict<X: TabularData + ?Sized>(&self, x: &X) -> Result<Vec<Array1<Score>>> {
        self.model.staged_predict(x)
    }

    /// R² of the predictions for `x` against the one-column response `y`.
    pub fn score<X, Y>(&self, x: &X, y: &Y) -> Result<f64>
    where
        X: TabularData + ?Sized,
        Y: TabularData + ?Sized,
    {
        if y.num_columns() != 1 {
            return Err(GbrtError::dimension_mismatch(
                "1 response column",
                format!("{} response columns", y.num_columns()),
            ));
        }
        let predictions = self.predict(x)?;
        let targets = Array1::from(y.column(0));
        r_squared(&predictions.view(), &targets.view())
    }

    /// Normalized split importances per feature.
    pub fn feature_importances(&self) -> Vec<f64> {
        self.model.feature_importances()
    }
}

#[cfg(test)]
mod tests {
    use crate::boosting::GradientBoostedRegressorBuilder;
    use crate::dataset::ColumnFrame;
    use approx::assert_abs_diff_eq;

    fn fitted() -> (super::GradientBoostedRegressor, ColumnFrame, Vec<f64>) {
        let x0: Vec<f64> = (0..50).map(|i| (i % 10) as f64).collect();
        let x1: Vec<f64> = (0..50).map(|i| (i / 10) as f64).collect();
        let y: Vec<f64> = x0.iter().map(|v| if *v < 5.0 { 1.0 } else { 3.0 }).collect();
        let x = ColumnFrame::new(vec![x0, x1]).unwrap();
        let model = GradientBoostedRegressorBuilder::new(10, 1, 1.0)
            .unwrap()
            .fit(&x, &y)
            .unwrap();
        (model, x, y)
    }

    #[test]
    fn test_score_perfect_fit() {
        let (model, x, y) = fitted();
        assert_abs_diff_eq!(model.score(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_feature_importances_pick_informative_column() {
        let (model, _, _) = fitted();
        let importances = model.feature_importances();
        assert_eq!(importances.len(), 2);
        assert_abs_diff_eq!(importances[0], 1.0, epsilon = 1e-12);
        assert_eq!(importances[1], 0.0);
    }

    #[test]
    fn test_staged_predict_ends_at_predict() {
        let (model, x, _) = fitted();
        let stages = model.staged_predict(&x).unwrap();
        assert_eq!(stages.len(), model.training_history().len());
        assert_eq!(stages.last().unwrap(), &model.predict(&x).unwrap());
    }

    #[test]
    fn test_score_rejects_wide_response() {
        let (model, x, _) = fitted();
        let wide = ColumnFrame::new(vec![vec![0.0; 50], vec![0.0; 50]]).unwrap();
        assert!(model.score(&x, &wide).is_err());
    }

    #[test]
    fn test_deserialized_model_is_validated() {
        let (model, x, _) = fitted();
        let json = serde_json::to_value(&model).unwrap();
        let restored: super::GradientBoostedRegressor =
            serde_json::from_value(json.clone()).unwrap();
        let expected = model.predict(&x).unwrap();
        for (a, b) in restored.predict(&x).unwrap().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }

        let mut hollow = json;
        hollow["model"]["trees"] = serde_json::json!([]);
        assert!(serde_json::from_value::<super::GradientBoostedRegressor>(hollow).is_err());
    }
}
