//! Execution contexts for running a fit as one opaque unit of work.
//!
//! Callers hand an [`Executor`] a closure and block until it returns. A panic
//! inside the closure is captured and surfaced as
//! [`GbrtError::Execution`] instead of unwinding through the caller.
//!
//! ```rust
//! use gbrt_rust::executor::{Executor, InlineExecutor};
//!
//! # fn main() -> gbrt_rust::Result<()> {
//! let answer = InlineExecutor.evaluate(|| 6 * 7)?;
//! assert_eq!(answer, 42);
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use crate::core::error::{GbrtError, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Runs a zero-argument unit of work and returns its value.
pub trait Executor {
    fn evaluate<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> T + Send,
        T: Send;
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unit of work panicked".to_string()
    }
}

fn run_captured<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(work))
        .map_err(|payload| GbrtError::execution(panic_message(payload)))
}

/// Runs work on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn evaluate<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        run_captured(work)
    }
}

/// Runs work inside a dedicated rayon pool.
///
/// Parallel split search started from within the work uses this pool, so
/// its size bounds the parallelism of the whole fit.
pub struct ThreadPoolExecutor {
    pool: ThreadPool,
}

impl ThreadPoolExecutor {
    /// Pool with `num_threads` workers; 0 selects all available cores.
    pub fn new(num_threads: usize) -> Result<Self> {
        let threads = if num_threads == 0 {
            num_cpus::get()
        } else {
            num_threads
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("gbrt-worker-{}", index))
            .build()
            .map_err(|e| GbrtError::execution(format!("Failed to build thread pool: {}", e)))?;
        log::debug!("Thread pool executor started with {} workers", threads);
        Ok(ThreadPoolExecutor { pool })
    }

    /// Pool sized by [`Config::effective_num_threads`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.effective_num_threads())
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl fmt::Debug for ThreadPoolExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPoolExecutor")
            .field("num_threads", &self.num_threads())
            .finish()
    }
}

impl Executor for ThreadPoolExecutor {
    fn evaluate<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        self.pool.install(|| run_captured(work))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_executor() {
        assert_eq!(InlineExecutor.evaluate(|| "done").unwrap(), "done");
    }

    #[test]
    fn test_panic_becomes_execution_error() {
        let err = InlineExecutor
            .evaluate(|| -> usize { panic!("boom") })
            .unwrap_err();
        assert!(matches!(err, GbrtError::Execution { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_thread_pool_executor() {
        let executor = ThreadPoolExecutor::new(2).unwrap();
        assert_eq!(executor.num_threads(), 2);
        let name = executor
            .evaluate(|| std::thread::current().name().map(str::to_string))
            .unwrap();
        assert!(name.unwrap().starts_with("gbrt-worker-"));
    }

    #[test]
    fn test_thread_pool_panic() {
        let executor = ThreadPoolExecutor::new(1).unwrap();
        let err = executor
            .evaluate(|| -> u8 { panic!("{}", String::from("worker failure")) })
            .unwrap_err();
        assert!(err.to_string().contains("worker failure"));
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            num_threads: 3,
            ..Config::default()
        };
        assert_eq!(ThreadPoolExecutor::from_config(&config).unwrap().num_threads(), 3);
    }
}
