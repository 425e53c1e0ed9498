//! Glide CLI
//!
//! Runs scroll controller scenarios against the headless surface and emits
//! JSON reports.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use glide_harness::{run_loaded_scenario, RunOutcome, Scenario};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::GlideConfig;

/// Headless runner for Glide scroll controller scenarios
#[derive(Parser, Debug)]
#[command(name = "glide")]
#[command(about = "Headless runner for Glide scroll controller scenarios")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one or more scenario files
    Run {
        /// Scenario JSON files
        #[arg(required = true)]
        scenarios: Vec<PathBuf>,

        /// Config file or directory holding glide.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the report of the last scenario to this relative path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Print the default configuration as TOML
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dispatch(cli.command) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "glide={level},glide_harness={level},glide_controllers={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(command: Command) -> Result<ExitCode> {
    match command {
        Command::Run {
            scenarios,
            config,
            report,
        } => run(&scenarios, config, report),
        Command::Config => {
            print!("{}", GlideConfig::default().to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run(scenarios: &[PathBuf], config: Option<PathBuf>, report: Option<PathBuf>) -> Result<ExitCode> {
    let config = match config {
        Some(path) => GlideConfig::load(&path)?,
        None => GlideConfig::load_or_default(&std::env::current_dir()?)?,
    };
    let harness = config.harness();

    let mut failed = 0;
    let mut last: Option<RunOutcome> = None;
    for path in scenarios {
        let scenario = Scenario::from_path(path)?;
        let outcome = run_loaded_scenario(&scenario, &harness)?;
        if outcome.is_failed() {
            failed += 1;
            error!(scenario = %path.display(), "scenario failed");
        } else {
            info!(scenario = %path.display(), "scenario passed");
        }
        outcome.report().write_to_writer(&mut std::io::stdout().lock())?;
        last = Some(outcome);
    }

    if let (Some(path), Some(outcome)) = (report, &last) {
        outcome.report().write_to_path(&path)?;
        info!(report = %path.display(), "report written");
    }

    info!(total = scenarios.len(), failed, "run finished");
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
