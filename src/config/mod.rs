//! Configuration: CLI parsing and resolved benchmark settings

pub mod benchmark_config;
pub mod cli;

pub use benchmark_config::BenchmarkConfig;
pub use cli::{CliArgs, Command, PoolMode, RunArgs};
