//! Rules: the flat node representation of a regression tree.
//!
//! A tree is an ordered sequence of [`Rule`]s with the root at index 0.
//! A [`SplitRule`] refers to its children by index into that same sequence.

use crate::core::types::{FeatureIndex, RuleIndex, Score};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal node: routes a sample by comparing one feature to a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRule {
    /// Feature dimension compared at this node
    pub dimension: FeatureIndex,
    /// Samples with `value < split_point` take `jump_if_less`
    pub split_point: f64,
    /// Index of the left child rule
    pub jump_if_less: RuleIndex,
    /// Index of the right child rule
    pub jump_if_higher: RuleIndex,
    /// Number of training samples that reached this node
    pub num_samples: usize,
    /// Reduction of per-sample variance achieved by the split
    pub impurity_improvement: f64,
    /// Mean fitting target over the node's samples
    pub leaf_value: Score,
}

impl SplitRule {
    /// Child index a sample with the given feature value is routed to.
    #[inline]
    pub fn next(&self, value: f64) -> RuleIndex {
        if value < self.split_point {
            self.jump_if_less
        } else {
            self.jump_if_higher
        }
    }
}

/// Terminal node carrying a constant prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafRule {
    /// Prediction emitted for every sample reaching this leaf
    pub leaf_value: Score,
    /// Number of training samples that reached this leaf
    pub num_samples: usize,
}

/// One node of a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    Split(SplitRule),
    Leaf(LeafRule),
}

impl Rule {
    /// Returns true if this rule is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Rule::Leaf(_))
    }

    /// Node value: the leaf prediction, or the node mean for a split.
    pub fn leaf_value(&self) -> Score {
        match self {
            Rule::Split(split) => split.leaf_value,
            Rule::Leaf(leaf) => leaf.leaf_value,
        }
    }

    /// Number of training samples that reached this node.
    pub fn num_samples(&self) -> usize {
        match self {
            Rule::Split(split) => split.num_samples,
            Rule::Leaf(leaf) => leaf.num_samples,
        }
    }

    pub fn as_split(&self) -> Option<&SplitRule> {
        match self {
            Rule::Split(split) => Some(split),
            Rule::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafRule> {
        match self {
            Rule::Leaf(leaf) => Some(leaf),
            Rule::Split(_) => None,
        }
    }
}

impl From<SplitRule> for Rule {
    fn from(rule: SplitRule) -> Self {
        Rule::Split(rule)
    }
}

impl From<LeafRule> for Rule {
    fn from(rule: LeafRule) -> Self {
        Rule::Leaf(rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Split(split) => write!(
                f,
                "Split(x[{}] < {} ? {} : {}, n={}, improvement={})",
                split.dimension,
                split.split_point,
                split.jump_if_less,
                split.jump_if_higher,
                split.num_samples,
                split.impurity_improvement
            ),
            Rule::Leaf(leaf) => write!(f, "Leaf({}, n={})", leaf.leaf_value, leaf.num_samples),
        }
    }
}
