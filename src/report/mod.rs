//! Benchmark report types
//!
//! A `Report` is an immutable, ordered collection of per-strategy results.
//! Order matches strategy registration order.

use std::fmt;

/// Immutable record of one strategy's measured pass
#[derive(Debug, Clone)]
pub struct StrategyResult {
    /// Strategy name
    pub strategy_name: String,
    /// Units submitted (factory invocations)
    pub dispatched: u64,
    /// Units confirmed finished without error
    pub completed: u64,
    /// Units that panicked during execution
    pub failed: u64,
    /// Units whose completion signal never arrived (timeout path only)
    pub unresolved: u64,
    /// True iff dispatch did not return before every unit finished
    pub completion_guaranteed: bool,
    /// Wall-clock time for the dispatch pass, in milliseconds
    pub elapsed_ms: f64,
    /// Error kind when the strategy's measurement was aborted
    pub error: Option<String>,
}

impl StrategyResult {
    /// Result for a strategy that joined every unit before returning.
    pub fn guaranteed(
        strategy_name: impl Into<String>,
        dispatched: u64,
        completed: u64,
        failed: u64,
        elapsed_ms: f64,
    ) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            dispatched,
            completed,
            failed,
            unresolved: 0,
            completion_guaranteed: true,
            elapsed_ms,
            error: None,
        }
    }

    /// Result for a strategy that gave up waiting on some units.
    pub fn partial(
        strategy_name: impl Into<String>,
        dispatched: u64,
        completed: u64,
        failed: u64,
        unresolved: u64,
        elapsed_ms: f64,
    ) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            dispatched,
            completed,
            failed,
            unresolved,
            completion_guaranteed: false,
            elapsed_ms,
            error: None,
        }
    }

    /// Result for a strategy whose measurement was aborted by a fatal error.
    pub fn aborted(strategy_name: impl Into<String>, error_kind: &str) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            dispatched: 0,
            completed: 0,
            failed: 0,
            unresolved: 0,
            completion_guaranteed: false,
            elapsed_ms: 0.0,
            error: Some(error_kind.to_string()),
        }
    }
}

impl fmt::Display for StrategyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dispatched={} completed={} failed={} guaranteed={} elapsedMs={:.3}",
            self.strategy_name,
            self.dispatched,
            self.completed,
            self.failed,
            self.completion_guaranteed,
            self.elapsed_ms
        )?;
        if self.unresolved > 0 {
            write!(f, " unresolved={}", self.unresolved)?;
        }
        if let Some(ref kind) = self.error {
            write!(f, " error={}", kind)?;
        }
        Ok(())
    }
}

/// Ordered, immutable sequence of strategy results
#[derive(Debug)]
pub struct Report {
    results: Vec<StrategyResult>,
}

impl Report {
    pub fn new(results: Vec<StrategyResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[StrategyResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Render the report, one line per strategy in registration order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            out.push_str(&result.to_string());
            out.push('\n');
        }
        out
    }
}
