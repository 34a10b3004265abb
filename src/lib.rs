//! # gbrt-rust
//!
//! Gradient-boosted regression trees in pure Rust.
//!
//! The trainer fits an additive sequence of depth-limited regression trees,
//! each one to the negative gradient of the loss at the current ensemble
//! prediction. Trees are grown greedily with an exact split search: every
//! boundary between distinct consecutive feature values is evaluated with
//! O(1) variance bookkeeping.
//!
//! ## Quick Start
//!
//! ```rust
//! use gbrt_rust::{ColumnFrame, GradientBoostedRegressorBuilder};
//!
//! # fn main() -> gbrt_rust::Result<()> {
//! let x = ColumnFrame::new(vec![
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
//!     vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
//! ])?;
//! let y = vec![1.0, 1.5, 3.0, 3.5, 5.0, 5.5];
//!
//! let model = GradientBoostedRegressorBuilder::new(50, 2, 0.1)?.fit(&x, &y)?;
//! let predictions = model.predict(&x)?;
//! assert_eq!(predictions.len(), 6);
//!
//! // Tree 0 holds the base prediction; one tree follows per round.
//! assert_eq!(model.additive_regression_tree().num_trees(), 51);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use gbrt_rust::{ConfigBuilder, GradientBoostedRegressorBuilder, LossType};
//!
//! # fn main() -> gbrt_rust::Result<()> {
//! let config = ConfigBuilder::new()
//!     .num_trees(200)
//!     .max_depth(4)
//!     .learning_rate(0.05)
//!     .min_samples_per_leaf(5)
//!     .loss(LossType::LeastAbsoluteDeviation)
//!     .build()?;
//! let builder = GradientBoostedRegressorBuilder::with_config(config)?;
//! # let _ = builder;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: numeric types, defaults, errors, logging setup
//! - [`config`]: [`Config`] and [`ConfigBuilder`], file and environment loading
//! - [`dataset`]: the [`TabularData`] access contract and [`TrainingData`]
//! - [`tree`]: impurity bookkeeping, split search, rules, tree induction
//! - [`boosting`]: losses, the boosting loop, the fitted ensemble, monitors
//! - [`metrics`]: regression metrics
//! - [`executor`]: run a fit as one unit of work, inline or on a thread pool

#![doc(html_root_url = "https://docs.rs/gbrt-rust/")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Tabular data access
pub mod dataset;

// Regression tree engine
pub mod tree;

// Boosting loop and fitted models
pub mod boosting;

// Evaluation metrics
pub mod metrics;

// Execution contexts
pub mod executor;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{GbrtError, Result},
    types::*,
};

pub use config::{Config, ConfigBuilder};

pub use dataset::{ColumnFrame, TabularData, TrainingData};

pub use tree::{
    ImpurityAccumulator, LeafRule, RegressionTree, RegressionTreeBuilder, Rule, SplitFinder,
    SplitInfo, SplitRule,
};

pub use boosting::{
    AdditiveRegressionTree, BoostingMonitor, EarlyStopping, GradientBoostedRegressor,
    GradientBoostedRegressorBuilder, LossFunction, RoundDecision, RoundSummary, TimeBudget,
};

pub use executor::{Executor, InlineExecutor, ThreadPoolExecutor};

// Version information
pub use crate::core::constants::GBRT_RUST_VERSION as VERSION;

/// Initialize the library's logging backend.
///
/// Installs `env_logger` (filter from `RUST_LOG`, `info` otherwise). Calling
/// it is optional and idempotent; hosts with their own `log` backend can skip it.
///
/// ```rust
/// fn main() -> gbrt_rust::Result<()> {
///     gbrt_rust::init()?;
///     assert!(gbrt_rust::is_initialized());
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    crate::core::initialize_logging();
    Ok(())
}

/// Check if [`init`] has run.
pub fn is_initialized() -> bool {
    crate::core::is_logging_initialized()
}
