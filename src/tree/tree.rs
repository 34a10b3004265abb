//! Fitted regression tree.
//!
//! A [`RegressionTree`] is a flat, pre-ordered sequence of [`Rule`]s. Index 0
//! is the root, and every split refers to children at strictly greater
//! indices, so routing a sample always terminates.

use crate::core::error::{GbrtError, Result};
use crate::core::types::{FeatureIndex, RuleIndex, Score};
use crate::dataset::TabularData;
use crate::tree::rule::{LeafRule, Rule};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single fitted regression tree.
///
/// Serialized as its bare rule sequence; deserializing re-checks the rule
/// links through [`RegressionTree::from_rules`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rule>", into = "Vec<Rule>")]
pub struct RegressionTree {
    rules: Vec<Rule>,
}

impl RegressionTree {
    /// A tree consisting of one leaf.
    pub fn constant(leaf_value: Score, num_samples: usize) -> Self {
        RegressionTree {
            rules: vec![Rule::Leaf(LeafRule {
                leaf_value,
                num_samples,
            })],
        }
    }

    /// Builds a tree from a rule sequence, checking that it is non-empty and
    /// that every split points forward to rules inside the sequence.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self> {
        crate::ensure!(
            !rules.is_empty(),
            GbrtError::dataset("a tree needs at least one rule")
        );
        for (index, rule) in rules.iter().enumerate() {
            if let Rule::Split(split) = rule {
                for child in [split.jump_if_less, split.jump_if_higher] {
                    if child <= index || child >= rules.len() {
                        return Err(GbrtError::dataset(format!(
                            "rule {} jumps to invalid index {} (tree has {} rules)",
                            index,
                            child,
                            rules.len()
                        )));
                    }
                }
            }
        }
        Ok(RegressionTree { rules })
    }

    /// The rule sequence, root first.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn num_rules(&self) -> usize {
        self.rules.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.rules.iter().filter(|rule| rule.is_leaf()).count()
    }

    /// Length of the longest root-to-leaf path, 0 for a single leaf.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.rules.len()];
        let mut max_depth = 0;
        // Children always follow their parent, so one forward pass suffices.
        for (index, rule) in self.rules.iter().enumerate() {
            match rule {
                Rule::Split(split) => {
                    depths[split.jump_if_less] = depths[index] + 1;
                    depths[split.jump_if_higher] = depths[index] + 1;
                }
                Rule::Leaf(_) => max_depth = max_depth.max(depths[index]),
            }
        }
        max_depth
    }

    /// Highest feature dimension referenced plus one; 0 for a constant tree.
    pub fn required_columns(&self) -> usize {
        self.rules
            .iter()
            .filter_map(Rule::as_split)
            .map(|split| split.dimension + 1)
            .max()
            .unwrap_or(0)
    }

    /// Routes a sample to its leaf, reading feature values through `value`.
    #[inline]
    pub fn route<F>(&self, value: F) -> RuleIndex
    where
        F: Fn(FeatureIndex) -> f64,
    {
        let mut index = 0;
        while let Rule::Split(split) = &self.rules[index] {
            index = split.next(value(split.dimension));
        }
        index
    }

    /// Index of the leaf rule reached by `row`.
    ///
    /// `row` must hold at least [`required_columns`](Self::required_columns) values.
    pub fn leaf_index(&self, row: &[f64]) -> RuleIndex {
        self.route(|dimension| row[dimension])
    }

    /// Leaf value reached by `row`.
    pub fn predict_row(&self, row: &[f64]) -> Score {
        self.rules[self.leaf_index(row)].leaf_value()
    }

    /// Predicts every row of a table.
    pub fn predict<X: TabularData + ?Sized>(&self, x: &X) -> Result<Array1<Score>> {
        let required = self.required_columns();
        if x.num_columns() < required {
            return Err(GbrtError::dimension_mismatch(
                format!("at least {} columns", required),
                format!("{} columns", x.num_columns()),
            ));
        }
        Ok(Array1::from_iter((0..x.num_rows()).map(|row| {
            let leaf = self.route(|dimension| x.value(row, dimension));
            self.rules[leaf].leaf_value()
        })))
    }

    /// Overwrites the value of a leaf rule.
    pub fn set_leaf_value(&mut self, index: RuleIndex, value: Score) -> Result<()> {
        match self.rules.get_mut(index) {
            Some(Rule::Leaf(leaf)) => {
                leaf.leaf_value = value;
                Ok(())
            }
            Some(Rule::Split(_)) => Err(GbrtError::invalid_parameter(
                "index",
                index.to_string(),
                "rule is a split, not a leaf",
            )),
            None => Err(GbrtError::invalid_parameter(
                "index",
                index.to_string(),
                format!("tree has {} rules", self.rules.len()),
            )),
        }
    }

    /// Sample-weighted impurity improvement accumulated per dimension,
    /// normalized to sum to 1 when any split exists.
    pub fn feature_importances(&self, num_features: usize) -> Vec<f64> {
        normalize_importances(self.raw_importances(num_features, self.max_improvement()))
    }

    /// Largest improvement of any split, 0.0 for a constant tree.
    pub(crate) fn max_improvement(&self) -> f64 {
        self.rules
            .iter()
            .filter_map(Rule::as_split)
            .map(|split| split.impurity_improvement)
            .fold(0.0, f64::max)
    }

    /// Unnormalized importances with improvements divided by `scale`, so
    /// sums stay finite when improvements are near `f64::MAX`. The ensemble
    /// passes one scale for all of its trees.
    pub(crate) fn raw_importances(&self, num_features: usize, scale: f64) -> Vec<f64> {
        let mut importances = vec![0.0; num_features];
        if scale <= 0.0 {
            return importances;
        }
        for split in self.rules.iter().filter_map(Rule::as_split) {
            if let Some(slot) = importances.get_mut(split.dimension) {
                *slot += split.impurity_improvement / scale * split.num_samples as f64;
            }
        }
        importances
    }
}

/// Divides importances by their sum; all zeros stay zeros.
pub(crate) fn normalize_importances(mut importances: Vec<f64>) -> Vec<f64> {
    let total: f64 = importances.iter().sum();
    if total > 0.0 {
        importances.iter_mut().for_each(|value| *value /= total);
    }
    importances
}

impl TryFrom<Vec<Rule>> for RegressionTree {
    type Error = GbrtError;

    fn try_from(rules: Vec<Rule>) -> Result<Self> {
        RegressionTree::from_rules(rules)
    }
}

impl From<RegressionTree> for Vec<Rule> {
    fn from(tree: RegressionTree) -> Self {
        tree.rules
    }
}

impl fmt::Display for RegressionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, rule) in self.rules.iter().enumerate() {
            writeln!(f, "{:>4}: {}", index, rule)?;
        }
        Ok(())
    }
}
