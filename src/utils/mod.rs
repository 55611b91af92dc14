//! Shared utilities

pub mod error;

pub use error::{BenchError, Result};
