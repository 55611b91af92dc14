//! Error types for dispatch-benchmark

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unrecoverable strategy failure (e.g. thread creation refused by the
    /// OS). Recorded in that strategy's result; the run continues.
    #[error("Strategy '{strategy}' failed: {reason}")]
    StrategyFatal { strategy: String, reason: String },

    /// Deadline expired before every completion signal arrived. Converted
    /// to a partial result by the strategy, never fatal.
    #[error("Strategy '{strategy}' timed out after {timeout_ms}ms with {unresolved} units unresolved")]
    Timeout {
        strategy: String,
        timeout_ms: u64,
        unresolved: u64,
    },
}

impl BenchError {
    /// Short machine-readable kind, attached to aborted strategy results.
    pub fn kind(&self) -> &'static str {
        match self {
            BenchError::Config(_) => "config",
            BenchError::StrategyFatal { .. } => "fatal",
            BenchError::Timeout { .. } => "timeout",
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
