//! Greedy top-down induction of a single regression tree.
//!
//! Nodes are grown depth first, left child before right child, and every
//! node's rule is appended as soon as the node is evaluated. A split rule's
//! left child therefore always sits at the next index, while its right child
//! index is patched in once the whole left subtree has been emitted.

use crate::config::Config;
use crate::core::error::{GbrtError, Result};
use crate::core::types::{RuleIndex, SampleIndex};
use crate::dataset::{TabularData, TrainingData};
use crate::tree::rule::{LeafRule, Rule, SplitRule};
use crate::tree::split::{SplitFinder, SplitFinderConfig, SplitInfo};
use crate::tree::tree::RegressionTree;
use log::trace;

/// Pending node: its samples, depth, and the parent slot waiting for its index.
struct NodeTask {
    samples: Vec<SampleIndex>,
    depth: usize,
    parent: Option<RuleIndex>,
}

/// Builder for single regression trees fitted by variance reduction.
#[derive(Debug, Clone)]
pub struct RegressionTreeBuilder {
    max_depth: usize,
    finder: SplitFinder,
}

impl RegressionTreeBuilder {
    /// Creates a builder limited to `max_depth` levels of splits.
    pub fn new(max_depth: usize) -> Self {
        RegressionTreeBuilder {
            max_depth,
            finder: SplitFinder::new(SplitFinderConfig::default()),
        }
    }

    /// Creates a builder from the tree growth fields of a [`Config`].
    pub fn from_config(config: &Config) -> Self {
        RegressionTreeBuilder {
            max_depth: config.depth_limit(),
            finder: SplitFinder::new(SplitFinderConfig {
                min_samples_per_leaf: config.min_samples_per_leaf.max(1),
                min_impurity_improvement: config.min_impurity_improvement,
                parallel: config.parallel_split_search,
            }),
        }
    }

    /// Sets the minimum number of samples each child must keep.
    pub fn with_min_samples_per_leaf(mut self, min_samples: usize) -> Self {
        let mut config = self.finder.config().clone();
        config.min_samples_per_leaf = min_samples.max(1);
        self.finder = SplitFinder::new(config);
        self
    }

    /// Sets the improvement a split must strictly exceed.
    pub fn with_min_impurity_improvement(mut self, threshold: f64) -> Self {
        let mut config = self.finder.config().clone();
        config.min_impurity_improvement = threshold;
        self.finder = SplitFinder::new(config);
        self
    }

    /// Scans feature dimensions on the rayon pool.
    pub fn with_parallel_split_search(mut self, enabled: bool) -> Self {
        let mut config = self.finder.config().clone();
        config.parallel = enabled;
        self.finder = SplitFinder::new(config);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn min_samples_per_leaf(&self) -> usize {
        self.finder.config().min_samples_per_leaf
    }

    /// Fits a tree to predictors `x` and a one-column response `y`.
    pub fn fit<X, Y>(&self, x: &X, y: &Y) -> Result<RegressionTree>
    where
        X: TabularData + ?Sized,
        Y: TabularData + ?Sized,
    {
        let data = TrainingData::from_frames(x, y)?;
        let samples: Vec<SampleIndex> = (0..data.num_rows()).collect();
        self.build(&data, data.response(), &samples)
    }

    /// Fits a tree to `targets` over the given subset of samples.
    ///
    /// `targets` is indexed by sample and must cover every row of `data`.
    pub fn build(
        &self,
        data: &TrainingData,
        targets: &[f64],
        samples: &[SampleIndex],
    ) -> Result<RegressionTree> {
        if samples.is_empty() {
            return Err(GbrtError::empty_sample_set("regression tree root"));
        }
        if targets.len() != data.num_rows() {
            return Err(GbrtError::dimension_mismatch(
                format!("{} targets", data.num_rows()),
                format!("{} targets", targets.len()),
            ));
        }
        if let Some(&sample) = samples.iter().find(|&&s| s >= data.num_rows()) {
            return Err(GbrtError::invalid_parameter(
                "samples",
                sample.to_string(),
                format!("sample index out of range for {} rows", data.num_rows()),
            ));
        }

        let mut rules: Vec<Rule> = Vec::new();
        let mut stack = vec![NodeTask {
            samples: samples.to_vec(),
            depth: 0,
            parent: None,
        }];

        while let Some(task) = stack.pop() {
            let index = rules.len();
            if let Some(parent) = task.parent {
                // Left children are emitted right after their parent.
                if let Rule::Split(split) = &mut rules[parent] {
                    if parent + 1 != index {
                        split.jump_if_higher = index;
                    }
                }
            }

            let leaf_value = mean_of(targets, &task.samples);
            let split = if task.depth < self.max_depth {
                self.finder.find_best_split(data, targets, &task.samples)
            } else {
                None
            };

            match split {
                None => rules.push(Rule::Leaf(LeafRule {
                    leaf_value,
                    num_samples: task.samples.len(),
                })),
                Some(split) => {
                    trace!(
                        "rule {}: x[{}] < {} (n={}, improvement={:.6e}, depth={})",
                        index,
                        split.dimension,
                        split.split_point,
                        task.samples.len(),
                        split.impurity_improvement,
                        task.depth
                    );
                    let (left, right) = partition(data, &split, &task.samples);
                    rules.push(Rule::Split(SplitRule {
                        dimension: split.dimension,
                        split_point: split.split_point,
                        jump_if_less: index + 1,
                        jump_if_higher: index + 1,
                        num_samples: task.samples.len(),
                        impurity_improvement: split.impurity_improvement,
                        leaf_value,
                    }));
                    // Right is pushed first so the left subtree is emitted first.
                    stack.push(NodeTask {
                        samples: right,
                        depth: task.depth + 1,
                        parent: Some(index),
                    });
                    stack.push(NodeTask {
                        samples: left,
                        depth: task.depth + 1,
                        parent: Some(index),
                    });
                }
            }
        }

        RegressionTree::from_rules(rules)
    }
}

fn mean_of(targets: &[f64], samples: &[SampleIndex]) -> f64 {
    samples.iter().map(|&s| targets[s]).sum::<f64>() / samples.len() as f64
}

/// Splits samples by `value < split_point`, keeping their relative order.
fn partition(
    data: &TrainingData,
    split: &SplitInfo,
    samples: &[SampleIndex],
) -> (Vec<SampleIndex>, Vec<SampleIndex>) {
    let column = data.feature(split.dimension);
    samples
        .iter()
        .partition(|&&sample| column[sample] < split.split_point)
}
