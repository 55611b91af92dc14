//! Benchmark orchestration
//!
//! - `DispatchCounters` / `CountdownLatch`: per-dispatch completion tracking
//! - `BenchmarkHarness`: runs registered strategies in order and collects
//!   the report

pub mod counters;
pub mod runner;

pub use counters::{CountdownLatch, DispatchCounters};
pub use runner::{noop_unit_factory, BenchmarkHarness};
