//! Cooperative task strategy
//!
//! Multiplexes N tasks over a small scheduler (a tokio multi-thread runtime
//! with few worker threads). Units are synchronous, so each task runs to
//! completion without internal suspension; the only suspension point is the
//! final join over all task handles.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::{run_unit, Strategy, WorkUnitFactory};
use crate::harness::counters::DispatchCounters;
use crate::report::StrategyResult;
use crate::utils::{BenchError, Result};

pub struct CooperativeTaskStrategy {
    workers: usize,
}

impl CooperativeTaskStrategy {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl Strategy for CooperativeTaskStrategy {
    fn name(&self) -> &'static str {
        "cooperative"
    }

    fn dispatch(&self, n: u64, factory: &WorkUnitFactory) -> Result<StrategyResult> {
        // Scheduler construction is part of the measured window.
        let start = Instant::now();

        // Scheduler is scoped to this call: built here, dropped before return.
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.workers)
            .thread_name("coop-worker")
            .build()
            .map_err(|e| BenchError::StrategyFatal {
                strategy: self.name().to_string(),
                reason: format!("failed to build scheduler: {e}"),
            })?;

        let counters = Arc::new(DispatchCounters::new());
        let mut handles = Vec::with_capacity(n as usize);

        for i in 0..n {
            let unit = factory(i);
            let counters = Arc::clone(&counters);
            handles.push(runtime.spawn(async move {
                run_unit(unit, i, &counters);
            }));
        }

        // Future-join over every task: completion is guaranteed on return.
        runtime.block_on(async {
            for handle in handles {
                let _ = handle.await;
            }
        });
        drop(runtime);

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            n,
            workers = self.workers,
            elapsed_ms,
            "cooperative dispatch complete"
        );

        Ok(StrategyResult::guaranteed(
            self.name(),
            n,
            counters.completed(),
            counters.failed(),
            elapsed_ms,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::tests::{check_strategy_contract, noop_factory, panicking_factory};

    #[test]
    fn test_contract() {
        check_strategy_contract(&CooperativeTaskStrategy::new(2));
    }

    #[test]
    fn test_all_units_complete() {
        let strategy = CooperativeTaskStrategy::new(2);
        let result = strategy.dispatch(1000, &noop_factory()).unwrap();

        assert_eq!(result.dispatched, 1000);
        assert_eq!(result.completed, 1000);
        assert_eq!(result.failed, 0);
        assert!(result.completion_guaranteed);
    }

    #[test]
    fn test_panicking_units_are_counted() {
        let strategy = CooperativeTaskStrategy::new(2);
        let result = strategy.dispatch(50, &panicking_factory()).unwrap();

        assert_eq!(result.failed, 50);
        assert_eq!(result.completed, 0);
        assert!(result.completion_guaranteed);
    }

    #[test]
    fn test_single_worker() {
        let strategy = CooperativeTaskStrategy::new(1);
        let result = strategy.dispatch(100, &noop_factory()).unwrap();
        assert_eq!(result.completed, 100);
    }
}
