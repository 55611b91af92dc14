//! dispatch-benchmark - compare concurrency strategies for dispatching
//! many small work units
//!
//! Exit codes: 0 on success (including partial per-strategy failure),
//! 1 on configuration error, 2 on an internal unrecoverable error before
//! any result was produced.

use clap::Parser as _;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod harness;
mod report;
mod strategy;
mod utils;

use config::{BenchmarkConfig, CliArgs, Command};
use harness::{noop_unit_factory, BenchmarkHarness};
use utils::BenchError;

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &BenchmarkConfig) {
    if config.quiet {
        return;
    }

    println!("dispatch-benchmark v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!("Units per strategy: {}", config.n);
    println!("Strategies: {:?}", config.strategies);
    println!(
        "Pool: size={} mode={:?} | Cooperative workers: {}",
        config.pool_size, config.pool_mode, config.cooperative_workers
    );
    println!("Reactive timeout: {}ms", config.timeout_ms);
    if config.warmup {
        println!("Warm-up: enabled");
    }
    println!("====================================\n");
}

fn run() -> anyhow::Result<()> {
    // clap exits with its own code on parse failure; remap so bad input is
    // always a configuration error (exit 1) and help/version stay exit 0.
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e)
            if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            let _ = e.print();
            std::process::exit(0);
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    setup_logging(args.verbose, args.quiet);

    let Command::Run(ref run_args) = args.command;
    let config = BenchmarkConfig::from_cli(run_args, args.quiet, args.verbose)
        .map_err(BenchError::Config)?;

    print_banner(&config);

    let harness = BenchmarkHarness::new(config)?;
    let report = harness.run(&noop_unit_factory());

    print!("{}", report.render());

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        let code = match e.downcast_ref::<BenchError>() {
            Some(BenchError::Config(_)) => 1,
            _ => 2,
        };
        std::process::exit(code);
    }
}
