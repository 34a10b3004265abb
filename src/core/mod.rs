//! Core infrastructure shared by the tree engine and the boosting loop.
//!
//! - [`types`]: numeric aliases and the loss enumeration
//! - [`constants`]: configuration defaults
//! - [`error`]: the error taxonomy and [`Result`] alias

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{GbrtError, Result};
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install `env_logger` as the `log` backend.
///
/// Falls back to the `info` filter when `RUST_LOG` is unset. Safe to call
/// more than once; a logger installed by the host application wins.
pub fn initialize_logging() {
    if LOGGING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_ok() {
        log::debug!("gbrt-rust {} logging initialized", GBRT_RUST_VERSION);
    }
}

/// Whether [`initialize_logging`] has run.
pub fn is_logging_initialized() -> bool {
    LOGGING_INITIALIZED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_initialization_is_idempotent() {
        initialize_logging();
        initialize_logging();
        assert!(is_logging_initialized());
    }

    #[test]
    fn test_version_constant() {
        assert!(!GBRT_RUST_VERSION.is_empty());
    }
}
