//! Regression tree engine.
//!
//! - [`impurity`]: running sums for O(1) variance updates
//! - [`split`]: exact best-split search over sorted feature values
//! - [`rule`]: split and leaf rules, the flat node representation
//! - [`tree`]: [`RegressionTree`], a fitted rule sequence
//! - [`builder`]: [`RegressionTreeBuilder`], greedy depth-limited induction

pub mod builder;
pub mod impurity;
pub mod rule;
pub mod split;
pub mod tree;

pub use builder::RegressionTreeBuilder;
pub use impurity::ImpurityAccumulator;
pub use rule::{LeafRule, Rule, SplitRule};
pub use split::{SplitFinder, SplitFinderConfig, SplitInfo};
pub use tree::RegressionTree;
