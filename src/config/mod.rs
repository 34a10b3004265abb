//! Configuration management for the boosting trainer.
//!
//! Configurations can be built programmatically through [`ConfigBuilder`],
//! loaded from `.json`/`.toml` files, or overridden from `GBRT_*`
//! environment variables. Every path ends in [`Config::validate`].

pub mod core;

pub use self::core::{Config, ConfigBuilder};

/// Conventional file name for a trainer configuration.
pub const DEFAULT_CONFIG_FILE: &str = "gbrt.toml";
