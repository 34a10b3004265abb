//! Default configuration values for the boosting trainer.

use crate::core::types::LossType;

/// Default number of boosting rounds.
pub const DEFAULT_NUM_TREES: usize = 100;

/// Default depth limit for every tree. The root sits at depth 0.
pub const DEFAULT_MAX_DEPTH: i32 = 3;

/// Default learning rate (shrinkage) applied to each tree's contribution.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Default minimum number of samples each child of a split must keep.
pub const DEFAULT_MIN_SAMPLES_PER_LEAF: usize = 1;

/// Default threshold a split's impurity improvement must exceed.
pub const DEFAULT_MIN_IMPURITY_IMPROVEMENT: f64 = 0.0;

/// Default loss function.
pub const DEFAULT_LOSS: LossType = LossType::LeastSquares;

/// Default worker count for thread-pool execution. 0 means all cores.
pub const DEFAULT_NUM_THREADS: usize = 0;

/// Prefix of environment variables read by `Config::load_from_environment`.
pub const ENV_PREFIX: &str = "GBRT_";

/// Crate version string.
pub const GBRT_RUST_VERSION: &str = env!("CARGO_PKG_VERSION");
