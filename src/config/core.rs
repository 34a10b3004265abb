//! Core configuration structure and builder for the boosting trainer.
//!
//! A [`Config`] carries every knob the trainer reads: the boosting schedule
//! (rounds, learning rate, loss), the tree growth policy (depth, minimum
//! samples per leaf, minimum improvement) and execution settings.

use crate::core::constants::*;
use crate::core::error::{GbrtError, Result};
use crate::core::types::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main configuration structure for fitting a boosted regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Boosting schedule
    /// Number of boosting rounds (trees fitted after the constant base tree)
    pub num_trees: usize,
    /// Learning rate (shrinkage) applied to each tree's contribution
    pub learning_rate: f64,
    /// Loss whose negative gradient each tree fits
    pub loss: LossType,

    // Tree growth policy
    /// Maximum depth of every tree; the root is depth 0
    pub max_depth: i32,
    /// Minimum number of samples each child of a split must keep
    pub min_samples_per_leaf: usize,
    /// Impurity improvement a split must strictly exceed
    pub min_impurity_improvement: f64,

    // Execution
    /// Scan feature dimensions concurrently on the rayon pool
    pub parallel_split_search: bool,
    /// Worker count for thread-pool execution (0 = all cores)
    pub num_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            num_trees: DEFAULT_NUM_TREES,
            learning_rate: DEFAULT_LEARNING_RATE,
            loss: DEFAULT_LOSS,

            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_per_leaf: DEFAULT_MIN_SAMPLES_PER_LEAF,
            min_impurity_improvement: DEFAULT_MIN_IMPURITY_IMPROVEMENT,

            parallel_split_search: false,
            num_threads: DEFAULT_NUM_THREADS,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.num_trees < 1 {
            return Err(GbrtError::invalid_parameter(
                "num_trees",
                self.num_trees.to_string(),
                "must be at least 1",
            ));
        }

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(GbrtError::invalid_parameter(
                "learning_rate",
                self.learning_rate.to_string(),
                "must be in range (0.0, 1.0]",
            ));
        }

        if self.max_depth < 0 {
            return Err(GbrtError::invalid_parameter(
                "max_depth",
                self.max_depth.to_string(),
                "must be non-negative",
            ));
        }

        if self.min_samples_per_leaf < 1 {
            return Err(GbrtError::invalid_parameter(
                "min_samples_per_leaf",
                self.min_samples_per_leaf.to_string(),
                "must be at least 1",
            ));
        }

        if !(self.min_impurity_improvement >= 0.0) || !self.min_impurity_improvement.is_finite() {
            return Err(GbrtError::invalid_parameter(
                "min_impurity_improvement",
                self.min_impurity_improvement.to_string(),
                "must be a finite, non-negative value",
            ));
        }

        if self.num_threads > num_cpus::get() * 2 {
            log::warn!(
                "num_threads ({}) is much larger than available cores ({})",
                self.num_threads,
                num_cpus::get()
            );
        }

        Ok(())
    }

    /// Depth limit as an unsigned value. Call after [`Config::validate`].
    pub fn depth_limit(&self) -> usize {
        self.max_depth.max(0) as usize
    }

    /// Get the effective number of threads (0 means use all available cores)
    pub fn effective_num_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GbrtError::config(format!("Failed to read config file: {}", e)))?;

        let config: Config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| GbrtError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| GbrtError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => {
                return Err(GbrtError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| GbrtError::config(format!("Failed to serialize to JSON: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| GbrtError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => {
                return Err(GbrtError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| GbrtError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load configuration from `GBRT_*` environment variables on top of the defaults
    pub fn load_from_environment() -> Result<Self> {
        let mut config = Config::default();
        config.read_environment(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GBRT_*` environment variables to an existing configuration
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        self.read_environment(|key| std::env::var(key).ok())?;
        self.validate()
    }

    fn read_environment<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
            raw.trim()
                .parse()
                .map_err(|_| GbrtError::config(format!("Invalid {}{}: '{}'", ENV_PREFIX, key, raw)))
        }

        let var = |key: &str| lookup(&format!("{}{}", ENV_PREFIX, key));

        if let Some(val) = var("NUM_TREES") {
            self.num_trees = parse("NUM_TREES", &val)?;
        }
        if let Some(val) = var("MAX_DEPTH") {
            self.max_depth = parse("MAX_DEPTH", &val)?;
        }
        if let Some(val) = var("LEARNING_RATE") {
            self.learning_rate = parse("LEARNING_RATE", &val)?;
        }
        if let Some(val) = var("MIN_SAMPLES_PER_LEAF") {
            self.min_samples_per_leaf = parse("MIN_SAMPLES_PER_LEAF", &val)?;
        }
        if let Some(val) = var("LOSS") {
            self.loss = parse("LOSS", &val)?;
        }
        if let Some(val) = var("NUM_THREADS") {
            self.num_threads = parse("NUM_THREADS", &val)?;
        }

        Ok(())
    }

    /// Get configuration as a parameter map (for logging)
    pub fn as_parameter_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("num_trees".to_string(), self.num_trees.to_string());
        map.insert("learning_rate".to_string(), self.learning_rate.to_string());
        map.insert("loss".to_string(), self.loss.to_string());
        map.insert("max_depth".to_string(), self.max_depth.to_string());
        map.insert(
            "min_samples_per_leaf".to_string(),
            self.min_samples_per_leaf.to_string(),
        );
        map.insert(
            "min_impurity_improvement".to_string(),
            self.min_impurity_improvement.to_string(),
        );
        map.insert(
            "parallel_split_search".to_string(),
            self.parallel_split_search.to_string(),
        );
        map.insert("num_threads".to_string(), self.num_threads.to_string());

        map
    }
}

/// Configuration builder for fluent configuration creation
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the number of boosting rounds
    pub fn num_trees(mut self, num_trees: usize) -> Self {
        if num_trees < 1 {
            self.validation_errors
                .push("num_trees must be at least 1".to_string());
        }
        self.config.num_trees = num_trees;
        self
    }

    /// Set the learning rate
    pub fn learning_rate(mut self, rate: f64) -> Self {
        if !(rate > 0.0 && rate <= 1.0) {
            self.validation_errors
                .push("learning_rate must be in range (0.0, 1.0]".to_string());
        }
        self.config.learning_rate = rate;
        self
    }

    /// Set the maximum tree depth
    pub fn max_depth(mut self, depth: i32) -> Self {
        if depth < 0 {
            self.validation_errors
                .push("max_depth must be non-negative".to_string());
        }
        self.config.max_depth = depth;
        self
    }

    /// Set the minimum number of samples per leaf
    pub fn min_samples_per_leaf(mut self, min_samples: usize) -> Self {
        if min_samples < 1 {
            self.validation_errors
                .push("min_samples_per_leaf must be at least 1".to_string());
        }
        self.config.min_samples_per_leaf = min_samples;
        self
    }

    /// Set the impurity improvement a split must exceed
    pub fn min_impurity_improvement(mut self, threshold: f64) -> Self {
        if !(threshold >= 0.0) {
            self.validation_errors
                .push("min_impurity_improvement must be non-negative".to_string());
        }
        self.config.min_impurity_improvement = threshold;
        self
    }

    /// Set the loss function
    pub fn loss(mut self, loss: LossType) -> Self {
        self.config.loss = loss;
        self
    }

    /// Enable or disable concurrent split search across dimensions
    pub fn parallel_split_search(mut self, enabled: bool) -> Self {
        self.config.parallel_split_search = enabled;
        self
    }

    /// Set number of threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        if !self.validation_errors.is_empty() {
            return Err(GbrtError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
