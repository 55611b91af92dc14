//! dispatch-benchmark library
//!
//! A concurrency-strategy micro-benchmark: dispatches N trivial work units
//! under interchangeable concurrency strategies (cooperative tasks, raw
//! threads, a scoped worker pool, reactive single-value pipelines) and
//! reports per-strategy timing and completion statistics.

pub mod config;
pub mod harness;
pub mod report;
pub mod strategy;
pub mod utils;
