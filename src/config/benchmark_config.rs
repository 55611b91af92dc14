//! Benchmark configuration derived from CLI arguments

use super::cli::{PoolMode, RunArgs};

/// Complete benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Work units dispatched per strategy
    pub n: u64,

    /// Strategy names to run, in registration order
    pub strategies: Vec<String>,

    /// Run a discarded warm-up pass before each measured pass
    pub warmup: bool,

    // Strategy tuning
    pub timeout_ms: u64,
    pub pool_size: u32,
    pub pool_mode: PoolMode,
    pub cooperative_workers: u32,

    // Output
    pub quiet: bool,
    pub verbose: bool,
}

impl BenchmarkConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(args: &RunArgs, quiet: bool, verbose: bool) -> Result<Self, String> {
        args.validate()?;

        Ok(Self {
            n: args.n,
            strategies: args.strategies.clone(),
            warmup: args.warmup,
            timeout_ms: args.timeout_ms,
            pool_size: args.effective_pool_size(),
            pool_mode: args.pool_mode,
            cooperative_workers: args.cooperative_workers,
            quiet,
            verbose,
        })
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            n: 1000,
            strategies: vec![
                "cooperative".to_string(),
                "raw-thread".to_string(),
                "pooled".to_string(),
                "reactive".to_string(),
            ],
            warmup: false,
            timeout_ms: 10_000,
            pool_size: std::thread::available_parallelism()
                .map(|p| p.get() as u32)
                .unwrap_or(4),
            pool_mode: PoolMode::Fixed,
            cooperative_workers: 2,
            quiet: false,
            verbose: false,
        }
    }
}
