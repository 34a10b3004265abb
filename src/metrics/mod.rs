//! Evaluation metrics for fitted regressors.
//!
//! ```rust
//! use gbrt_rust::metrics::{mean_squared_error, r_squared};
//! use ndarray::array;
//!
//! # fn main() -> gbrt_rust::Result<()> {
//! let predictions = array![1.0, 2.0, 3.0];
//! let targets = array![1.0, 2.0, 4.0];
//! let mse = mean_squared_error(&predictions.view(), &targets.view())?;
//! let r2 = r_squared(&predictions.view(), &targets.view())?;
//! assert!(mse > 0.0 && r2 < 1.0);
//! # Ok(())
//! # }
//! ```

pub mod regression;

pub use regression::{mean_absolute_error, mean_squared_error, r_squared, RegressionMetrics};
