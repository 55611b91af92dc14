//! Reactive stream strategy
//!
//! Models each unit as an independently-subscribed single-value pipeline
//! scheduled onto an I/O-sized thread pool. Every pipeline emits an explicit
//! terminal signal on a shared countdown; dispatch blocks until all N
//! signals arrive or the configured deadline passes, in which case it
//! returns a partial result with the unresolved count.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{run_unit, Strategy, WorkUnitFactory};
use crate::harness::counters::{CountdownLatch, DispatchCounters};
use crate::report::StrategyResult;
use crate::utils::{BenchError, Result};

/// Grace period for runtime teardown after a timeout. Stuck units are
/// abandoned rather than allowed to wedge the harness.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

pub struct ReactiveStreamStrategy {
    timeout: Duration,
}

impl ReactiveStreamStrategy {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn io_pool_size() -> usize {
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4)
    }
}

impl Strategy for ReactiveStreamStrategy {
    fn name(&self) -> &'static str {
        "reactive"
    }

    fn dispatch(&self, n: u64, factory: &WorkUnitFactory) -> Result<StrategyResult> {
        // Scheduler construction is part of the measured window.
        let start = Instant::now();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(Self::io_pool_size())
            .thread_name("reactive-io")
            .build()
            .map_err(|e| BenchError::StrategyFatal {
                strategy: self.name().to_string(),
                reason: format!("failed to build scheduler: {e}"),
            })?;

        let counters = Arc::new(DispatchCounters::new());
        let latch = Arc::new(CountdownLatch::new(n));

        for i in 0..n {
            let unit = factory(i);
            let counters = Arc::clone(&counters);
            let latch = Arc::clone(&latch);
            // Single-value pipeline: resolve the unit, then emit the
            // terminal signal. The counter write precedes the count_down,
            // so a zeroed latch implies fully settled counters.
            runtime.spawn(async move {
                run_unit(unit, i, &counters);
                latch.count_down();
            });
        }

        let outstanding = latch.wait_timeout(self.timeout);

        if outstanding == 0 {
            drop(runtime);
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            debug!(n, elapsed_ms, "reactive dispatch complete");
            return Ok(StrategyResult::guaranteed(
                self.name(),
                n,
                counters.completed(),
                counters.failed(),
                elapsed_ms,
            ));
        }

        let timeout = BenchError::Timeout {
            strategy: self.name().to_string(),
            timeout_ms: self.timeout.as_millis() as u64,
            unresolved: outstanding,
        };
        warn!(error = %timeout, "abandoning unresolved pipelines");
        runtime.shutdown_timeout(SHUTDOWN_GRACE);

        // Snapshot once after teardown; unresolved is derived from the same
        // snapshot so the counts always sum to n.
        let completed = counters.completed();
        let failed = counters.failed();
        let unresolved = n.saturating_sub(completed + failed);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(StrategyResult::partial(
            self.name(),
            n,
            completed,
            failed,
            unresolved,
            elapsed_ms,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::tests::{check_strategy_contract, noop_factory, panicking_factory};
    use crate::strategy::WorkUnit;

    #[test]
    fn test_contract() {
        check_strategy_contract(&ReactiveStreamStrategy::new(Duration::from_secs(10)));
    }

    #[test]
    fn test_all_signals_collected() {
        let strategy = ReactiveStreamStrategy::new(Duration::from_secs(10));
        let result = strategy.dispatch(1000, &noop_factory()).unwrap();

        assert_eq!(result.dispatched, 1000);
        assert_eq!(result.completed, 1000);
        assert_eq!(result.unresolved, 0);
        assert!(result.completion_guaranteed);
    }

    #[test]
    fn test_panicking_pipelines_signal_failure() {
        let strategy = ReactiveStreamStrategy::new(Duration::from_secs(10));
        let result = strategy.dispatch(50, &panicking_factory()).unwrap();

        assert_eq!(result.failed, 50);
        assert_eq!(result.completed, 0);
        assert!(result.completion_guaranteed);
    }

    #[test]
    fn test_timeout_yields_partial_result() {
        let slow_factory = |_: u64| -> WorkUnit {
            Box::new(|_| std::thread::sleep(Duration::from_millis(400)))
        };

        let strategy = ReactiveStreamStrategy::new(Duration::from_millis(30));
        let result = strategy.dispatch(64, &slow_factory).unwrap();

        assert_eq!(result.dispatched, 64);
        assert!(!result.completion_guaranteed);
        assert!(result.unresolved > 0);
        assert_eq!(
            result.completed + result.failed + result.unresolved,
            64
        );
    }
}
