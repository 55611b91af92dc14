//! Completion-tracking primitives shared between a strategy's workers
//!
//! These are the ONLY synchronization points inside a dispatch pass. Each
//! `dispatch` call owns its own instances; nothing is shared across
//! strategy runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Atomic counters recording per-unit outcomes for one dispatch pass
///
/// Design principle: workers only ever `fetch_add` with relaxed ordering;
/// the dispatch thread reads after its completion barrier, so no stronger
/// ordering is needed on the counters themselves.
#[derive(Debug, Default)]
pub struct DispatchCounters {
    completed: AtomicU64,
    failed: AtomicU64,
}

impl DispatchCounters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Units accounted for so far (finished or failed).
    pub fn settled(&self) -> u64 {
        self.completed() + self.failed()
    }
}

/// Countdown barrier: unblocks waiters once N signals have arrived
///
/// Workers call `count_down` exactly once per unit; the dispatch thread
/// blocks in `wait` or `wait_timeout`. The mutex acquire on the waiter side
/// orders all counter writes made before each `count_down`.
pub struct CountdownLatch {
    remaining: Mutex<u64>,
    zeroed: Condvar,
}

impl CountdownLatch {
    pub fn new(count: u64) -> Self {
        Self {
            remaining: Mutex::new(count),
            zeroed: Condvar::new(),
        }
    }

    /// Record one signal. Extra signals past zero are ignored.
    pub fn count_down(&self) {
        let mut remaining = self.remaining.lock();
        if *remaining > 0 {
            *remaining -= 1;
            if *remaining == 0 {
                self.zeroed.notify_all();
            }
        }
    }

    /// Block until the count reaches zero.
    pub fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            self.zeroed.wait(&mut remaining);
        }
    }

    /// Block until the count reaches zero or the timeout elapses.
    /// Returns the number of signals still outstanding.
    pub fn wait_timeout(&self, timeout: Duration) -> u64 {
        let deadline = Instant::now() + timeout;
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            if self.zeroed.wait_until(&mut remaining, deadline).timed_out() {
                break;
            }
        }
        *remaining
    }
}
