//! Concurrency strategies for dispatching work units
//!
//! Each strategy executes N work units under a distinct concurrency model:
//! - `CooperativeTaskStrategy`: tasks multiplexed over a small scheduler
//! - `RawThreadStrategy`: one OS thread per unit
//! - `PooledExecutorStrategy`: a scoped worker pool
//! - `ReactiveStreamStrategy`: one independently-scheduled async pipeline
//!   per unit, with a completion deadline
//!
//! All strategies catch per-unit panics, count them, and never abort the
//! remaining dispatches.

pub mod cooperative;
pub mod pooled;
pub mod raw_thread;
pub mod reactive;

use std::panic::{self, AssertUnwindSafe};

use crate::config::BenchmarkConfig;
use crate::harness::counters::DispatchCounters;
use crate::report::StrategyResult;
use crate::utils::Result;

pub use cooperative::CooperativeTaskStrategy;
pub use pooled::PooledExecutorStrategy;
pub use raw_thread::RawThreadStrategy;
pub use reactive::ReactiveStreamStrategy;

/// One dispatched unit of work. Takes its dispatch index, returns nothing.
///
/// Units must be side-effect free with respect to each other: no shared
/// mutable captures across invocations (enforced by convention, not the
/// type system).
pub type WorkUnit = Box<dyn FnOnce(u64) + Send>;

/// Produces the work unit for a given dispatch index. Supplied once per
/// harness run; called on the dispatching thread for `i` in `[0, n)`.
pub type WorkUnitFactory = dyn Fn(u64) -> WorkUnit + Send + Sync;

/// A concurrency model for executing N work units.
pub trait Strategy: Send + Sync {
    /// Stable name used in CLI selection and report lines.
    fn name(&self) -> &'static str;

    /// Invoke `factory(i)` for `i` in `[0, n)` and execute each unit under
    /// this strategy's concurrency model. Execution order across units is
    /// unspecified.
    ///
    /// Returns a result whose `completion_guaranteed` flag is true only if
    /// the call did not return before every unit finished or failed. An
    /// `Err` is reserved for unrecoverable failures (e.g. the OS refusing
    /// thread creation); per-unit panics never surface here.
    fn dispatch(&self, n: u64, factory: &WorkUnitFactory) -> Result<StrategyResult>;
}

/// Execute one unit, recording its outcome. Panics are contained here.
pub(crate) fn run_unit(unit: WorkUnit, index: u64, counters: &DispatchCounters) {
    match panic::catch_unwind(AssertUnwindSafe(|| unit(index))) {
        Ok(()) => counters.record_completed(),
        Err(_) => counters.record_failed(),
    }
}

/// Known strategy kinds, in canonical registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Cooperative,
    RawThread,
    Pooled,
    Reactive,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Cooperative,
        StrategyKind::RawThread,
        StrategyKind::Pooled,
        StrategyKind::Reactive,
    ];

    /// Parse a CLI strategy name. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "cooperative" | "coop" => Some(StrategyKind::Cooperative),
            "raw-thread" | "thread" => Some(StrategyKind::RawThread),
            "pooled" | "pool" => Some(StrategyKind::Pooled),
            "reactive" | "stream" => Some(StrategyKind::Reactive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Cooperative => "cooperative",
            StrategyKind::RawThread => "raw-thread",
            StrategyKind::Pooled => "pooled",
            StrategyKind::Reactive => "reactive",
        }
    }

    /// Construct the strategy with settings taken from the configuration.
    pub fn build(&self, config: &BenchmarkConfig) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Cooperative => Box::new(CooperativeTaskStrategy::new(
                config.cooperative_workers as usize,
            )),
            StrategyKind::RawThread => Box::new(RawThreadStrategy::new()),
            StrategyKind::Pooled => Box::new(PooledExecutorStrategy::new(
                config.pool_size as usize,
                config.pool_mode,
            )),
            StrategyKind::Reactive => Box::new(ReactiveStreamStrategy::new(
                std::time::Duration::from_millis(config.timeout_ms),
            )),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Factory producing units that record nothing and never fail.
    pub(crate) fn noop_factory() -> Box<dyn Fn(u64) -> WorkUnit + Send + Sync> {
        Box::new(|_| -> WorkUnit { Box::new(|_| {}) })
    }

    /// Factory producing units that always panic.
    pub(crate) fn panicking_factory() -> Box<dyn Fn(u64) -> WorkUnit + Send + Sync> {
        Box::new(|_| -> WorkUnit { Box::new(|_| panic!("unit failure")) })
    }

    #[test]
    fn test_parse_canonical_names() {
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_parse_aliases_and_case() {
        assert_eq!(
            StrategyKind::parse("COOP"),
            Some(StrategyKind::Cooperative)
        );
        assert_eq!(StrategyKind::parse(" pool "), Some(StrategyKind::Pooled));
        assert_eq!(StrategyKind::parse("stream"), Some(StrategyKind::Reactive));
    }

    #[test]
    fn test_parse_unknown_name() {
        assert_eq!(StrategyKind::parse("fibers"), None);
        assert_eq!(StrategyKind::parse(""), None);
    }

    #[test]
    fn test_run_unit_counts_outcomes() {
        let counters = DispatchCounters::new();

        run_unit(Box::new(|_| {}), 0, &counters);
        run_unit(Box::new(|_| panic!("boom")), 1, &counters);

        assert_eq!(counters.completed(), 1);
        assert_eq!(counters.failed(), 1);
    }

    /// Shared contract checks run against every strategy implementation.
    pub(crate) fn check_strategy_contract(strategy: &dyn Strategy) {
        // Empty dispatch is an immediate no-op.
        let result = strategy.dispatch(0, &noop_factory()).unwrap();
        assert_eq!(result.dispatched, 0);
        assert_eq!(result.completed, 0);
        assert_eq!(result.failed, 0);

        // All units accounted for.
        let result = strategy.dispatch(100, &noop_factory()).unwrap();
        assert_eq!(result.dispatched, 100);
        assert_eq!(result.completed + result.failed + result.unresolved, 100);
        if result.completion_guaranteed {
            assert_eq!(result.completed, 100);
        }

        // Deterministic counts across identical runs.
        let again = strategy.dispatch(100, &noop_factory()).unwrap();
        assert_eq!(again.dispatched, result.dispatched);
        assert_eq!(again.completed, result.completed);
        assert_eq!(again.failed, result.failed);
    }
}
