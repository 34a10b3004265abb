//! Additive ensemble of regression trees.
//!
//! Tree 0 holds the constant initial prediction as a single leaf; every
//! following tree is one boosting round whose output is scaled by the
//! learning rate.

use crate::core::error::{GbrtError, Result};
use crate::core::types::Score;
use crate::dataset::TabularData;
use crate::tree::tree::normalize_importances;
use crate::tree::RegressionTree;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Fitted boosting ensemble: `tree_0 + learning_rate * sum(tree_k)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnsembleParts")]
pub struct AdditiveRegressionTree {
    trees: Vec<RegressionTree>,
    learning_rate: f64,
    num_features: usize,
}

/// Unchecked serialized form, validated on the way in.
#[derive(Deserialize)]
struct EnsembleParts {
    trees: Vec<RegressionTree>,
    learning_rate: f64,
    num_features: usize,
}

impl TryFrom<EnsembleParts> for AdditiveRegressionTree {
    type Error = GbrtError;

    fn try_from(parts: EnsembleParts) -> Result<Self> {
        match parts.trees.first() {
            Some(base) if base.num_rules() == 1 => {}
            Some(_) => return Err(GbrtError::dataset("base tree must be a single leaf")),
            None => return Err(GbrtError::dataset("ensemble has no base tree")),
        }
        if !parts.learning_rate.is_finite() {
            return Err(GbrtError::invalid_parameter(
                "learning_rate",
                parts.learning_rate.to_string(),
                "must be finite",
            ));
        }
        if let Some(tree) = parts
            .trees
            .iter()
            .find(|tree| tree.required_columns() > parts.num_features)
        {
            return Err(GbrtError::dimension_mismatch(
                format!("at most {} feature columns", parts.num_features),
                format!("a tree reading {} columns", tree.required_columns()),
            ));
        }
        Ok(AdditiveRegressionTree {
            trees: parts.trees,
            learning_rate: parts.learning_rate,
            num_features: parts.num_features,
        })
    }
}

impl AdditiveRegressionTree {
    /// Starts an ensemble from its constant base prediction.
    pub fn new(
        base_prediction: Score,
        num_samples: usize,
        learning_rate: f64,
        num_features: usize,
    ) -> Self {
        AdditiveRegressionTree {
            trees: vec![RegressionTree::constant(base_prediction, num_samples)],
            learning_rate,
            num_features,
        }
    }

    /// Appends the tree fitted in one boosting round.
    pub(crate) fn push_round(&mut self, tree: RegressionTree) {
        self.trees.push(tree);
    }

    /// All trees, the base tree first.
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Number of trees including the base tree.
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of boosting rounds (trees after the base tree).
    pub fn num_rounds(&self) -> usize {
        self.trees.len() - 1
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Number of predictor columns the ensemble was fitted on.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// The constant initial prediction held by tree 0.
    pub fn base_prediction(&self) -> Score {
        self.trees[0].rules()[0].leaf_value()
    }

    /// Predicts one row of feature values.
    pub fn predict_row(&self, row: &[f64]) -> Result<Score> {
        if row.len() != self.num_features {
            return Err(GbrtError::dimension_mismatch(
                format!("{} features", self.num_features),
                format!("{} features", row.len()),
            ));
        }
        Ok(self.predict_with(|dimension| row[dimension]))
    }

    /// Predicts every row of a table.
    pub fn predict<X: TabularData + ?Sized>(&self, x: &X) -> Result<Array1<Score>> {
        self.check_columns(x)?;
        Ok(Array1::from_iter((0..x.num_rows()).map(|row| {
            self.predict_with(|dimension| x.value(row, dimension))
        })))
    }

    /// Predictions after each boosting round, one array per round.
    pub fn staged_predict<X: TabularData + ?Sized>(&self, x: &X) -> Result<Vec<Array1<Score>>> {
        self.check_columns(x)?;
        let mut current = Array1::from_elem(x.num_rows(), self.base_prediction());
        let mut stages = Vec::with_capacity(self.num_rounds());
        for tree in &self.trees[1..] {
            for (row, prediction) in current.iter_mut().enumerate() {
                let leaf = tree.route(|dimension| x.value(row, dimension));
                *prediction += self.learning_rate * tree.rules()[leaf].leaf_value();
            }
            stages.push(current.clone());
        }
        Ok(stages)
    }

    /// Split importances summed over all rounds, normalized to 1.
    pub fn feature_importances(&self) -> Vec<f64> {
        let scale = self.trees[1..]
            .iter()
            .map(RegressionTree::max_improvement)
            .fold(0.0, f64::max);
        let mut importances = vec![0.0; self.num_features];
        for tree in &self.trees[1..] {
            for (total, value) in importances
                .iter_mut()
                .zip(tree.raw_importances(self.num_features, scale))
            {
                *total += value;
            }
        }
        normalize_importances(importances)
    }

    /// Accumulates rounds in fitting order, so predictions on training rows
    /// reproduce the trainer's running prediction exactly.
    fn predict_with<F>(&self, value: F) -> Score
    where
        F: Fn(usize) -> f64,
    {
        self.trees[1..]
            .iter()
            .fold(self.base_prediction(), |prediction, tree| {
                prediction + self.learning_rate * tree.rules()[tree.route(&value)].leaf_value()
            })
    }

    fn check_columns<X: TabularData + ?Sized>(&self, x: &X) -> Result<()> {
        if x.num_columns() != self.num_features {
            return Err(GbrtError::dimension_mismatch(
                format!("{} feature columns", self.num_features),
                format!("{} feature columns", x.num_columns()),
            ));
        }
        Ok(())
    }
}
