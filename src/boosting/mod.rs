//! Gradient boosting over regression trees.
//!
//! [`GradientBoostedRegressorBuilder`] runs the boosting loop and returns a
//! [`GradientBoostedRegressor`] wrapping the fitted
//! [`AdditiveRegressionTree`]. Losses live in [`loss`], round monitors in
//! [`monitor`].

pub mod builder;
pub mod ensemble;
pub mod loss;
pub mod monitor;
pub mod regressor;

pub use builder::GradientBoostedRegressorBuilder;
pub use ensemble::AdditiveRegressionTree;
pub use loss::{
    create_loss_function, LeastAbsoluteDeviationLoss, LeastSquaresLoss, LossFunction,
};
pub use monitor::{
    BoostingMonitor, EarlyStopping, NoMonitor, RoundDecision, RoundSummary, TimeBudget,
};
pub use regressor::GradientBoostedRegressor;
