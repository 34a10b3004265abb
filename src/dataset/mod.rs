//! Tabular data access for training and prediction.
//!
//! - [`frame`]: the [`TabularData`] contract and the [`ColumnFrame`] store
//! - [`dataset`]: [`TrainingData`], the validated copy the trainer works on

pub mod dataset;
pub mod frame;

pub use dataset::TrainingData;
pub use frame::{ColumnFrame, TabularData};
