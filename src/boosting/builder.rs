//! The gradient boosting loop.

use crate::boosting::ensemble::AdditiveRegressionTree;
use crate::boosting::loss::create_loss_function;
use crate::boosting::monitor::{BoostingMonitor, NoMonitor, RoundDecision, RoundSummary};
use crate::boosting::regressor::GradientBoostedRegressor;
use crate::config::Config;
use crate::core::error::Result;
use crate::core::types::{SampleIndex, Score};
use crate::dataset::{TabularData, TrainingData};
use crate::tree::RegressionTreeBuilder;
use log::{debug, info};
use std::time::Instant;

/// Fits [`GradientBoostedRegressor`]s.
///
/// Each round computes the loss's negative gradient at the current
/// prediction, fits one depth-limited regression tree to it, and adds the
/// tree's output scaled by the learning rate.
#[derive(Debug, Clone)]
pub struct GradientBoostedRegressorBuilder {
    config: Config,
}

impl GradientBoostedRegressorBuilder {
    /// Builder with `num_trees` rounds of depth-`max_depth` trees, all other
    /// settings at their defaults.
    pub fn new(num_trees: usize, max_depth: i32, learning_rate: f64) -> Result<Self> {
        Self::with_config(Config {
            num_trees,
            max_depth,
            learning_rate,
            ..Config::default()
        })
    }

    /// Builder from a complete configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(GradientBoostedRegressorBuilder { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fits predictors `x` against the one-column response `y`.
    pub fn fit<X, Y>(&self, x: &X, y: &Y) -> Result<GradientBoostedRegressor>
    where
        X: TabularData + ?Sized,
        Y: TabularData + ?Sized,
    {
        self.fit_with_monitor(x, y, &mut NoMonitor)
    }

    /// Fits like [`fit`](Self::fit), consulting `monitor` after every round.
    pub fn fit_with_monitor<X, Y, M>(
        &self,
        x: &X,
        y: &Y,
        monitor: &mut M,
    ) -> Result<GradientBoostedRegressor>
    where
        X: TabularData + ?Sized,
        Y: TabularData + ?Sized,
        M: BoostingMonitor + ?Sized,
    {
        let data = TrainingData::from_frames(x, y)?;
        self.fit_training_data(&data, monitor)
    }

    /// Fits already validated training data.
    pub fn fit_training_data<M>(
        &self,
        data: &TrainingData,
        monitor: &mut M,
    ) -> Result<GradientBoostedRegressor>
    where
        M: BoostingMonitor + ?Sized,
    {
        let config = &self.config;
        let num_rows = data.num_rows();
        let response = data.response();
        let loss = create_loss_function(config.loss);

        info!(
            "Fitting {} rounds on {} rows x {} features (loss={}, max_depth={}, learning_rate={})",
            config.num_trees,
            num_rows,
            data.num_features(),
            loss.name(),
            config.max_depth,
            config.learning_rate
        );

        let base = loss.initial_prediction(response);
        let mut model =
            AdditiveRegressionTree::new(base, num_rows, config.learning_rate, data.num_features());
        let tree_builder = RegressionTreeBuilder::from_config(config);
        let samples: Vec<SampleIndex> = (0..num_rows).collect();

        // Running prediction and fitting target; owned by this call only.
        let mut predictions: Vec<Score> = vec![base; num_rows];
        let mut residuals: Vec<f64> = vec![0.0; num_rows];
        let mut history = Vec::with_capacity(config.num_trees);
        let started = Instant::now();

        for round in 1..=config.num_trees {
            loss.negative_gradient(response, &predictions, &mut residuals)?;
            let mut tree = tree_builder.build(data, &residuals, &samples)?;
            loss.refit_leaves(&mut tree, data, &predictions)?;

            for (sample, prediction) in predictions.iter_mut().enumerate() {
                let leaf = tree.route(|dimension| data.feature_value(sample, dimension));
                *prediction += config.learning_rate * tree.rules()[leaf].leaf_value();
            }

            let training_loss = loss.loss(response, &predictions);
            debug!(
                "Round {}: training loss {:.6}, {} rules",
                round,
                training_loss,
                tree.num_rules()
            );
            history.push(training_loss);

            let summary = RoundSummary {
                round,
                training_loss,
                num_rules: tree.num_rules(),
                elapsed: started.elapsed(),
            };
            model.push_round(tree);

            if monitor.after_round(&summary) == RoundDecision::Stop {
                info!("Boosting stopped by monitor after {} rounds", round);
                break;
            }
        }

        Ok(GradientBoostedRegressor::new(
            model,
            history,
            self.config.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boosting::monitor::EarlyStopping;
    use crate::core::error::GbrtError;
    use crate::core::types::LossType;
    use crate::dataset::ColumnFrame;
    use approx::assert_abs_diff_eq;

    fn linear_data(n: usize) -> (ColumnFrame, Vec<f64>) {
        let x0: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let x1: Vec<f64> = (0..n).map(|i| ((i * 7) % 5) as f64).collect();
        let y: Vec<f64> = x0.iter().zip(&x1).map(|(a, b)| 2.0 * a + b).collect();
        (ColumnFrame::new(vec![x0, x1]).unwrap(), y)
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            GradientBoostedRegressorBuilder::new(0, 3, 0.1),
            Err(GbrtError::InvalidParameter { .. })
        ));
        assert!(GradientBoostedRegressorBuilder::new(10, -1, 0.1).is_err());
        assert!(GradientBoostedRegressorBuilder::new(10, 3, 0.0).is_err());
    }

    #[test]
    fn test_tree_count_includes_base() {
        let (x, y) = linear_data(40);
        let model = GradientBoostedRegressorBuilder::new(5, 2, 0.5)
            .unwrap()
            .fit(&x, &y)
            .unwrap();
        let ensemble = model.additive_regression_tree();
        assert_eq!(ensemble.num_trees(), 6);
        assert_eq!(ensemble.trees()[0].num_rules(), 1);
        assert_abs_diff_eq!(
            ensemble.base_prediction(),
            y.iter().sum::<f64>() / 40.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_huge_finite_responses() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![1e160, 1e160, -1e160, -1e160];
        let model = GradientBoostedRegressorBuilder::new(1, 1, 1.0)
            .unwrap()
            .fit(&x, &y)
            .unwrap();

        let tree = &model.additive_regression_tree().trees()[1];
        let root = tree.rules()[0].as_split().unwrap();
        assert_eq!(root.split_point, 1.5);
        assert!(root.impurity_improvement.is_finite());
        assert_eq!(tree.rules()[1].leaf_value(), 1e160);
        assert_eq!(tree.rules()[2].leaf_value(), -1e160);

        assert_eq!(model.predict_row(&[0.0]).unwrap(), 1e160);
        assert_eq!(model.predict_row(&[3.0]).unwrap(), -1e160);
        assert_eq!(model.feature_importances(), vec![1.0]);
        assert!(serde_json::to_string(&model).is_ok());
    }

    #[test]
    fn test_training_loss_decreases() {
        let (x, y) = linear_data(60);
        let model = GradientBoostedRegressorBuilder::new(20, 3, 0.3)
            .unwrap()
            .fit(&x, &y)
            .unwrap();
        let history = model.training_history();
        assert_eq!(history.len(), 20);
        for pair in history.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12);
        }
    }

    #[test]
    fn test_predictions_replay_running_prediction() {
        let (x, y) = linear_data(30);
        let model = GradientBoostedRegressorBuilder::new(8, 2, 0.4)
            .unwrap()
            .fit(&x, &y)
            .unwrap();
        let predictions = model.predict(&x).unwrap();
        let loss = 0.5
            * predictions
                .iter()
                .zip(&y)
                .map(|(p, t)| (p - t) * (p - t))
                .sum::<f64>()
            / 30.0;
        assert_eq!(loss, *model.training_history().last().unwrap());
    }

    #[test]
    fn test_monitor_stops_early() {
        let (x, y) = linear_data(30);
        let builder = GradientBoostedRegressorBuilder::new(50, 2, 0.5).unwrap();
        let mut stop_after_three = |summary: &RoundSummary| {
            if summary.round == 3 {
                RoundDecision::Stop
            } else {
                RoundDecision::Continue
            }
        };
        let model = builder
            .fit_with_monitor(&x, &y, &mut stop_after_three)
            .unwrap();
        assert_eq!(model.additive_regression_tree().num_rounds(), 3);
        assert_eq!(model.training_history().len(), 3);
    }

    #[test]
    fn test_early_stopping_on_constant_response() {
        let (x, _) = linear_data(20);
        let y = vec![5.0; 20];
        let builder = GradientBoostedRegressorBuilder::new(100, 2, 0.1).unwrap();
        let mut monitor = EarlyStopping::new(3, 0.0);
        let model = builder.fit_with_monitor(&x, &y, &mut monitor).unwrap();
        assert!(model.additive_regression_tree().num_rounds() < 100);
        assert_eq!(model.predict_row(&[3.0, 1.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_least_absolute_deviation_is_robust() {
        let (x, mut y) = linear_data(41);
        y[40] = 1e6;
        let config = Config {
            num_trees: 30,
            max_depth: 3,
            learning_rate: 0.5,
            loss: LossType::LeastAbsoluteDeviation,
            ..Config::default()
        };
        let model = GradientBoostedRegressorBuilder::with_config(config)
            .unwrap()
            .fit(&x, &y)
            .unwrap();
        let base = model.additive_regression_tree().base_prediction();
        let mut sorted = y.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(base, sorted[20]);
        // The outlier does not drag typical predictions upward.
        let p = model.predict_row(&x.row(10)).unwrap();
        assert!((p - y[10]).abs() < 20.0);
    }

    #[test]
    fn test_mismatched_rows_rejected() {
        let (x, _) = linear_data(10);
        let y = vec![1.0; 9];
        let builder = GradientBoostedRegressorBuilder::new(3, 2, 0.1).unwrap();
        assert!(matches!(
            builder.fit(&x, &y),
            Err(GbrtError::DimensionMismatch { .. })
        ));
    }
}
