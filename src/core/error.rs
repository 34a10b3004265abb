//! Error handling and error types for the regression tree trainer.
//!
//! Every fallible operation returns [`Result`]. Input problems (bad
//! configuration, malformed data) are reported at fit entry before any tree
//! is built; nothing is retried internally.

use std::io;
use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum GbrtError {
    /// Invalid configuration parameter
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Malformed dataset (no rows, no columns, non-finite values)
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Row or column counts that should agree do not
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// A tree builder was handed a node with no samples
    #[error("Empty sample set: {context}")]
    EmptySampleSet { context: String },

    /// Configuration file or environment override could not be used
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The evaluation context failed to run a unit of work
    #[error("Execution error: {message}")]
    Execution { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Type alias for Results using GbrtError
pub type Result<T> = std::result::Result<T, GbrtError>;

impl GbrtError {
    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        GbrtError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        GbrtError::Dataset {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        GbrtError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an empty sample set error
    pub fn empty_sample_set<S: Into<String>>(context: S) -> Self {
        GbrtError::EmptySampleSet {
            context: context.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        GbrtError::Config {
            message: message.into(),
        }
    }

    /// Create an execution error
    pub fn execution<S: Into<String>>(message: S) -> Self {
        GbrtError::Execution {
            message: message.into(),
        }
    }

    /// Whether the error belongs to the caller-supplied invalid input class.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            GbrtError::InvalidParameter { .. }
                | GbrtError::Dataset { .. }
                | GbrtError::DimensionMismatch { .. }
                | GbrtError::EmptySampleSet { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            GbrtError::InvalidParameter { .. } => "invalid_parameter",
            GbrtError::Dataset { .. } => "dataset",
            GbrtError::DimensionMismatch { .. } => "dimension_mismatch",
            GbrtError::EmptySampleSet { .. } => "empty_sample_set",
            GbrtError::Config { .. } => "config",
            GbrtError::Execution { .. } => "execution",
            GbrtError::Io { .. } => "io",
            GbrtError::Json { .. } => "json",
        }
    }
}

/// Return early with the given error if the condition does not hold.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}
