//! Raw thread strategy: one OS thread per unit
//!
//! Intentionally wasteful; included to demonstrate the cost of thread
//! creation. For very large N this strategy degrades as spawn cost
//! dominates, and the harness never caps N on its behalf.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::debug;

use super::{run_unit, Strategy, WorkUnitFactory};
use crate::harness::counters::DispatchCounters;
use crate::report::StrategyResult;
use crate::utils::{BenchError, Result};

#[derive(Default)]
pub struct RawThreadStrategy;

impl RawThreadStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for RawThreadStrategy {
    fn name(&self) -> &'static str {
        "raw-thread"
    }

    fn dispatch(&self, n: u64, factory: &WorkUnitFactory) -> Result<StrategyResult> {
        let start = Instant::now();
        let counters = Arc::new(DispatchCounters::new());
        let mut handles = Vec::with_capacity(n as usize);
        let mut spawn_error = None;

        for i in 0..n {
            let unit = factory(i);
            let counters = Arc::clone(&counters);
            let spawned = thread::Builder::new()
                .name(format!("unit-{i}"))
                .spawn(move || run_unit(unit, i, &counters));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Resource exhaustion. Stop dispatching, but still join
                    // everything already started before surfacing the error.
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        for handle in handles {
            let _ = handle.join();
        }

        if let Some(e) = spawn_error {
            return Err(BenchError::StrategyFatal {
                strategy: self.name().to_string(),
                reason: format!("thread creation failed: {e}"),
            });
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(n, elapsed_ms, "raw-thread dispatch complete");

        Ok(StrategyResult::guaranteed(
            self.name(),
            n,
            counters.completed(),
            counters.failed(),
            elapsed_ms,
        ))
    }
}
