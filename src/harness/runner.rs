//! Benchmark harness
//!
//! Runs each registered strategy in order: an optional discarded warm-up
//! pass (avoids first-call allocation skew), then the measured pass.
//! Strategy runs are serialized so each strategy's concurrency model
//! dominates its own measurement. A fatal error aborts only that strategy's
//! measurement; the run continues with the next one.

use tracing::{info, warn};

use crate::config::BenchmarkConfig;
use crate::report::{Report, StrategyResult};
use crate::strategy::{Strategy, StrategyKind, WorkUnitFactory};
use crate::utils::{BenchError, Result};

pub struct BenchmarkHarness {
    config: BenchmarkConfig,
    strategies: Vec<Box<dyn Strategy>>,
}

impl BenchmarkHarness {
    /// Build the harness, resolving every configured strategy name.
    /// Unknown names are a configuration error; nothing runs.
    pub fn new(config: BenchmarkConfig) -> Result<Self> {
        let kinds: Vec<StrategyKind> = config
            .strategies
            .iter()
            .map(|name| {
                StrategyKind::parse(name)
                    .ok_or_else(|| BenchError::Config(format!("Unknown strategy: {name}")))
            })
            .collect::<Result<_>>()?;

        let strategies = kinds.iter().map(|k| k.build(&config)).collect();

        Ok(Self { config, strategies })
    }

    /// Registered strategy names, in run order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run every registered strategy against the supplied factory and
    /// collect the report. Always produces one result per strategy.
    pub fn run(&self, factory: &WorkUnitFactory) -> Report {
        let n = self.config.n;
        let mut results = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            if self.config.warmup {
                info!(strategy = strategy.name(), n, "warm-up pass");
                if let Err(e) = strategy.dispatch(n, factory) {
                    warn!(strategy = strategy.name(), error = %e, "warm-up failed; skipping strategy");
                    results.push(StrategyResult::aborted(strategy.name(), e.kind()));
                    continue;
                }
            }

            info!(strategy = strategy.name(), n, "measured pass");
            match strategy.dispatch(n, factory) {
                Ok(result) => {
                    info!(
                        strategy = strategy.name(),
                        completed = result.completed,
                        failed = result.failed,
                        elapsed_ms = result.elapsed_ms,
                        "strategy finished"
                    );
                    results.push(result);
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "strategy aborted");
                    results.push(StrategyResult::aborted(strategy.name(), e.kind()));
                }
            }
        }

        Report::new(results)
    }
}

/// The default work unit for CLI runs: a trivial computation on the index,
/// kept opaque to the optimizer.
pub fn noop_unit_factory() -> impl Fn(u64) -> crate::strategy::WorkUnit + Send + Sync {
    |_| -> crate::strategy::WorkUnit {
        Box::new(|index| {
            std::hint::black_box(index);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::PoolMode;

    fn config_with(strategies: &[&str], n: u64) -> BenchmarkConfig {
        BenchmarkConfig {
            n,
            strategies: strategies.iter().map(|s| s.to_string()).collect(),
            warmup: false,
            timeout_ms: 10_000,
            pool_size: 4,
            pool_mode: PoolMode::Fixed,
            cooperative_workers: 2,
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn test_unknown_strategy_is_config_error() {
        let config = config_with(&["cooperative", "fibers"], 10);
        let err = BenchmarkHarness::new(config).map(|_| ()).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
        assert!(err.to_string().contains("fibers"));
    }

    #[test]
    fn test_results_follow_registration_order() {
        let config = config_with(&["pooled", "cooperative"], 10);
        let harness = BenchmarkHarness::new(config).unwrap();
        assert_eq!(harness.strategy_names(), vec!["pooled", "cooperative"]);

        let report = harness.run(&noop_unit_factory());

        let names: Vec<_> = report
            .results()
            .iter()
            .map(|r| r.strategy_name.as_str())
            .collect();
        assert_eq!(names, vec!["pooled", "cooperative"]);
    }

    #[test]
    fn test_all_strategies_thousand_units() {
        let config = config_with(&["cooperative", "raw-thread", "pooled", "reactive"], 1000);
        let harness = BenchmarkHarness::new(config).unwrap();
        let report = harness.run(&noop_unit_factory());

        assert_eq!(report.len(), 4);
        for result in report.results() {
            assert_eq!(result.dispatched, 1000);
            assert!(result.completed <= 1000);
        }
        // The three join-based strategies guarantee completion.
        for result in &report.results()[..3] {
            assert_eq!(result.completed, 1000);
            assert!(result.completion_guaranteed);
        }
    }

    #[test]
    fn test_warmup_does_not_change_counts() {
        let mut config = config_with(&["pooled"], 200);
        config.warmup = true;
        let harness = BenchmarkHarness::new(config).unwrap();
        let report = harness.run(&noop_unit_factory());

        assert_eq!(report.len(), 1);
        assert_eq!(report.results()[0].completed, 200);
    }

    #[test]
    fn test_failing_units_reflected_per_strategy() {
        let config = config_with(&["cooperative", "pooled"], 30);
        let harness = BenchmarkHarness::new(config).unwrap();
        let factory = |_: u64| -> crate::strategy::WorkUnit {
            Box::new(|_| panic!("injected failure"))
        };
        let report = harness.run(&factory);

        for result in report.results() {
            assert_eq!(result.failed, 30);
            assert_eq!(result.completed, 0);
            assert!(result.completion_guaranteed);
        }
    }
}
