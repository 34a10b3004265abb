//! Split search for regression tree nodes.
//!
//! [`SplitFinder`] evaluates every boundary between distinct consecutive
//! feature values and reports the variance-minimizing [`SplitInfo`].

pub mod finder;

pub use finder::{split_point_between, SplitFinder, SplitFinderConfig, SplitInfo};
