//! Exact split search over sorted feature values.
//!
//! For every feature dimension the node's samples are stably sorted by
//! value and swept left to right with a pair of [`ImpurityAccumulator`]s.
//! Each boundary between two distinct consecutive values is a candidate;
//! the candidate with the largest impurity improvement wins, with ties
//! going to the lower dimension and then the lower threshold.

use crate::core::types::{FeatureIndex, SampleIndex};
use crate::dataset::TrainingData;
use crate::tree::impurity::ImpurityAccumulator;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Information about the best split found for a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitInfo {
    /// Feature index for the split
    pub dimension: FeatureIndex,
    /// Samples with `value < split_point` go left
    pub split_point: f64,
    /// Reduction of the node's per-sample variance
    pub impurity_improvement: f64,
    /// Samples routed left
    pub left_count: usize,
    /// Samples routed right
    pub right_count: usize,
}

impl SplitInfo {
    /// Whether `self` should replace `current` as the best candidate.
    ///
    /// Only a strictly larger improvement wins, so the first candidate seen
    /// in scan order keeps ties.
    pub fn is_better_than(&self, current: Option<&SplitInfo>) -> bool {
        match current {
            None => true,
            Some(best) => self.impurity_improvement > best.impurity_improvement,
        }
    }
}

impl PartialOrd for SplitInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.impurity_improvement
            .partial_cmp(&other.impurity_improvement)
    }
}

/// Configuration for split finding operations.
#[derive(Debug, Clone)]
pub struct SplitFinderConfig {
    /// Minimum number of samples each side of a split must keep
    pub min_samples_per_leaf: usize,
    /// Improvement a split must strictly exceed
    pub min_impurity_improvement: f64,
    /// Scan dimensions on the rayon pool
    pub parallel: bool,
}

impl Default for SplitFinderConfig {
    fn default() -> Self {
        SplitFinderConfig {
            min_samples_per_leaf: 1,
            min_impurity_improvement: 0.0,
            parallel: false,
        }
    }
}

/// Split finder for identifying the variance-minimizing split of a node.
#[derive(Debug, Clone)]
pub struct SplitFinder {
    config: SplitFinderConfig,
}

impl SplitFinder {
    /// Creates a new split finder with the given configuration.
    pub fn new(config: SplitFinderConfig) -> Self {
        SplitFinder { config }
    }

    /// Returns the finder configuration.
    pub fn config(&self) -> &SplitFinderConfig {
        &self.config
    }

    /// Finds the best split of `samples` over all dimensions of `data`,
    /// fitting `targets` (indexed by sample).
    ///
    /// Returns `None` when no boundary satisfies the minimum-samples policy
    /// with an improvement above the configured threshold. The reported
    /// improvement saturates at `f64::MAX` for responses too large for
    /// their variance to be represented.
    pub fn find_best_split(
        &self,
        data: &TrainingData,
        targets: &[f64],
        samples: &[SampleIndex],
    ) -> Option<SplitInfo> {
        let num_samples = samples.len();
        if num_samples < 2 * self.config.min_samples_per_leaf.max(1) {
            return None;
        }

        // Variance is shift-invariant: targets are centred on the node mean
        // and divided by a power of two near their magnitude, so the
        // sum-of-squares bookkeeping neither overflows nor loses precision.
        // Power-of-two scaling is exact and undone on the result.
        let magnitude = samples
            .iter()
            .map(|&s| targets[s].abs())
            .fold(0.0, f64::max);
        if magnitude == 0.0 || !magnitude.is_finite() {
            return None;
        }
        let scale = power_of_two_below(magnitude);
        let shift = samples.iter().map(|&s| targets[s] / scale).sum::<f64>() / num_samples as f64;
        let node_targets: Vec<f64> = samples
            .iter()
            .map(|&s| targets[s] / scale - shift)
            .collect();

        let parent = ImpurityAccumulator::from_values(node_targets.iter().copied());
        if parent.impurity() <= 0.0 {
            return None;
        }
        let threshold = self.config.min_impurity_improvement / scale / scale;

        let scan = |dimension: FeatureIndex| {
            self.scan_feature(
                dimension,
                data.feature(dimension),
                samples,
                &node_targets,
                &parent,
                threshold,
            )
        };

        let per_dimension: Vec<Option<SplitInfo>> = if self.config.parallel {
            (0..data.num_features()).into_par_iter().map(scan).collect()
        } else {
            (0..data.num_features()).map(scan).collect()
        };

        // Reduce in dimension order so the parallel path keeps the serial tie-break.
        let mut best: Option<SplitInfo> = None;
        for split in per_dimension.into_iter().flatten() {
            if split.is_better_than(best.as_ref()) {
                best = Some(split);
            }
        }

        best.map(|split| SplitInfo {
            impurity_improvement: (split.impurity_improvement * scale * scale).min(f64::MAX),
            ..split
        })
    }

    /// Best split along one feature column, in the units of `node_targets`
    /// (aligned with `samples`).
    fn scan_feature(
        &self,
        dimension: FeatureIndex,
        column: &[f64],
        samples: &[SampleIndex],
        node_targets: &[f64],
        parent: &ImpurityAccumulator,
        threshold: f64,
    ) -> Option<SplitInfo> {
        let num_samples = samples.len();
        let min_leaf = self.config.min_samples_per_leaf.max(1);
        if num_samples < 2 * min_leaf {
            return None;
        }

        let mut sorted: Vec<(f64, f64)> = samples
            .iter()
            .zip(node_targets)
            .map(|(&s, &target)| (column[s], target))
            .collect();
        // `sort_by` is stable: equal values keep their sample order.
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let parent_impurity = parent.impurity();
        let mut left = ImpurityAccumulator::new();
        let mut right = *parent;
        let mut best: Option<SplitInfo> = None;

        for i in 0..num_samples - 1 {
            let (value, target) = sorted[i];
            left.add(target);
            right.remove(target);

            let next_value = sorted[i + 1].0;
            if value >= next_value {
                continue;
            }
            if left.count() < min_leaf {
                continue;
            }
            if right.count() < min_leaf {
                break;
            }

            let improvement =
                (parent_impurity - left.impurity() - right.impurity()) / num_samples as f64;
            if improvement <= threshold {
                continue;
            }

            let candidate = SplitInfo {
                dimension,
                split_point: split_point_between(value, next_value),
                impurity_improvement: improvement,
                left_count: left.count(),
                right_count: right.count(),
            };
            if candidate.is_better_than(best.as_ref()) {
                best = Some(candidate);
            }
        }

        best
    }
}

/// Power of two within a factor of two of `value` (positive and finite),
/// limited to the normal exponent range.
fn power_of_two_below(value: f64) -> f64 {
    let exponent = value.log2().floor().clamp(-1022.0, 1023.0) as i64;
    f64::from_bits(((exponent + 1023) as u64) << 52)
}

/// Midpoint of two distinct values, nudged to `upper` if rounding collapses
/// it onto `lower`. Guarantees `lower < split <= upper`.
pub fn split_point_between(lower: f64, upper: f64) -> f64 {
    let midpoint = lower + (upper - lower) / 2.0;
    if midpoint > lower && midpoint <= upper {
        midpoint
    } else {
        upper
    }
}
