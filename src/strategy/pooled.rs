//! Pooled executor strategy
//!
//! A worker pool scoped to the dispatch call: created on entry, drained and
//! joined before return on every exit path. Jobs flow through an mpsc
//! channel whose receiver is shared between workers behind a mutex; closing
//! the sender after the last submission is the drain signal, and joining
//! the workers is the completion barrier.
//!
//! Sizing is configurable: `fixed` starts all workers up front, `elastic`
//! grows on demand when no worker is idle, up to a cap.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::Mutex;
use tracing::debug;

use super::{run_unit, Strategy, WorkUnit, WorkUnitFactory};
use crate::config::PoolMode;
use crate::harness::counters::DispatchCounters;
use crate::report::StrategyResult;
use crate::utils::{BenchError, Result};

type Job = (u64, WorkUnit);

/// Elastic pools may grow to this multiple of the configured size.
const ELASTIC_GROWTH_FACTOR: usize = 4;

pub struct PooledExecutorStrategy {
    size: usize,
    mode: PoolMode,
}

impl PooledExecutorStrategy {
    pub fn new(size: usize, mode: PoolMode) -> Self {
        Self {
            size: size.max(1),
            mode,
        }
    }

    fn spawn_worker(
        &self,
        id: usize,
        rx: Arc<Mutex<Receiver<Job>>>,
        counters: Arc<DispatchCounters>,
        idle: Arc<AtomicUsize>,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("pool-worker-{id}"))
            .spawn(move || loop {
                idle.fetch_add(1, Ordering::SeqCst);
                let job = rx.lock().recv();
                idle.fetch_sub(1, Ordering::SeqCst);
                match job {
                    Ok((i, unit)) => run_unit(unit, i, &counters),
                    // Sender dropped: the pool is draining.
                    Err(_) => break,
                }
            })
    }
}

impl Strategy for PooledExecutorStrategy {
    fn name(&self) -> &'static str {
        "pooled"
    }

    fn dispatch(&self, n: u64, factory: &WorkUnitFactory) -> Result<StrategyResult> {
        // Pool construction is part of the measured window.
        let start = Instant::now();
        let counters = Arc::new(DispatchCounters::new());
        let idle = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel::<Job>();
        let rx = Arc::new(Mutex::new(rx));

        let mut workers: Vec<JoinHandle<()>> = Vec::new();
        let mut fatal = None;

        let (initial, cap) = match self.mode {
            PoolMode::Fixed => {
                let size = self.size.min(n as usize);
                (size, size)
            }
            PoolMode::Elastic => (0, self.size * ELASTIC_GROWTH_FACTOR),
        };

        for id in 0..initial {
            match self.spawn_worker(
                id,
                Arc::clone(&rx),
                Arc::clone(&counters),
                Arc::clone(&idle),
            ) {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    fatal = Some(format!("worker creation failed: {e}"));
                    break;
                }
            }
        }

        if fatal.is_none() {
            for i in 0..n {
                // Elastic growth: add a worker when none is idle.
                if self.mode == PoolMode::Elastic
                    && idle.load(Ordering::SeqCst) == 0
                    && workers.len() < cap
                {
                    match self.spawn_worker(
                        workers.len(),
                        Arc::clone(&rx),
                        Arc::clone(&counters),
                        Arc::clone(&idle),
                    ) {
                        Ok(handle) => workers.push(handle),
                        Err(e) => {
                            fatal = Some(format!("worker creation failed: {e}"));
                            break;
                        }
                    }
                }

                let unit = factory(i);
                if tx.send((i, unit)).is_err() {
                    // Cannot happen while we hold the receiver, but a lost
                    // unit must not be silently dropped from the counts.
                    fatal = Some("job queue closed unexpectedly".to_string());
                    break;
                }
            }
        }

        // Barrier: close the queue, then join every worker. Runs on the
        // error path too, so no worker outlives this call.
        drop(tx);
        let pool_peak = workers.len();
        for handle in workers {
            let _ = handle.join();
        }

        if let Some(reason) = fatal {
            return Err(BenchError::StrategyFatal {
                strategy: self.name().to_string(),
                reason,
            });
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            n,
            pool_peak,
            mode = ?self.mode,
            elapsed_ms,
            "pooled dispatch complete"
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
