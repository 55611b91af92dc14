//! Command-line argument parsing
//!
//! The benchmark exposes a single `run` subcommand. Arguments are grouped
//! by category for clarity.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Micro-benchmark comparing concurrency strategies for dispatching work units
#[derive(Parser, Debug, Clone)]
#[command(name = "dispatch-benchmark")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode (results only, no banner)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the benchmark across the selected strategies
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    // ===== Benchmark Parameters =====
    /// Number of work units to dispatch per strategy
    #[arg(short = 'n', long = "n", default_value_t = 1000)]
    pub n: u64,

    /// Strategies to run, in order (cooperative, raw-thread, pooled, reactive)
    #[arg(
        long = "strategies",
        value_delimiter = ',',
        default_value = "cooperative,raw-thread,pooled,reactive"
    )]
    pub strategies: Vec<String>,

    /// Run a discarded warm-up pass before each measured pass
    #[arg(long = "warmup")]
    pub warmup: bool,

    // ===== Strategy Tuning =====
    /// Completion timeout for the reactive strategy, in milliseconds
    #[arg(long = "timeout-ms", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Worker threads for the pooled strategy (0 = available parallelism)
    #[arg(long = "pool-size", default_value_t = 0)]
    pub pool_size: u32,

    /// Pool sizing mode for the pooled strategy
    #[arg(long = "pool-mode", value_enum, default_value_t = PoolMode::Fixed)]
    pub pool_mode: PoolMode,

    /// Worker threads for the cooperative scheduler
    #[arg(long = "cooperative-workers", default_value_t = 2)]
    pub cooperative_workers: u32,
}

/// Pool sizing mode for the pooled executor strategy
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolMode {
    /// Fixed number of workers, all started up front
    #[default]
    Fixed,
    /// Workers spawned on demand when none are idle, up to a cap
    Elastic,
}

impl RunArgs {
    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.n == 0 {
            return Err("--n must be at least 1".to_string());
        }

        if self.strategies.is_empty() {
            return Err("--strategies must name at least one strategy".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("--timeout-ms must be at least 1".to_string());
        }

        if self.cooperative_workers == 0 {
            return Err("--cooperative-workers must be at least 1".to_string());
        }

        Ok(())
    }

    /// Effective pool size (0 = auto-detect from host parallelism)
    pub fn effective_pool_size(&self) -> u32 {
        if self.pool_size == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get() as u32)
                .unwrap_or(4)
        } else {
            self.pool_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(args)
    }

    #[test]
    fn test_default_args() {
        let args = parse(&["test", "run"]);
        let Command::Run(run) = args.command;
        assert_eq!(run.n, 1000);
        assert_eq!(run.timeout_ms, 10_000);
        assert_eq!(
            run.strategies,
            vec!["cooperative", "raw-thread", "pooled", "reactive"]
        );
        assert!(!run.warmup);
    }

    #[test]
    fn test_strategy_list_parsing() {
        let args = parse(&["test", "run", "--strategies", "pooled,raw-thread"]);
        let Command::Run(run) = args.command;
        assert_eq!(run.strategies, vec!["pooled", "raw-thread"]);
    }

    #[test]
    fn test_pool_mode() {
        let args = parse(&["test", "run", "--pool-mode", "elastic"]);
        let Command::Run(run) = args.command;
        assert_eq!(run.pool_mode, PoolMode::Elastic);
    }

    #[test]
    fn test_validation_zero_n() {
        let args = parse(&["test", "run", "--n", "0"]);
        let Command::Run(run) = args.command;
        assert!(run.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let args = parse(&["test", "run", "--timeout-ms", "0"]);
        let Command::Run(run) = args.command;
        assert!(run.validate().is_err());
    }

    #[test]
    fn test_effective_pool_size_auto() {
        let args = parse(&["test", "run"]);
        let Command::Run(run) = args.command;
        assert!(run.effective_pool_size() >= 1);
    }
}
