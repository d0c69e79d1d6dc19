//! LPX cache CLI - operator tooling for the LPX reference-data cache
//!
//! This CLI provides an `lpx` command for inspecting cache configuration and
//! running simulated workloads through a data provider.

mod commands;
mod config;
mod source;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{ConfigCommand, SimulateArgs};

/// LPX cache CLI
#[derive(Parser, Debug)]
#[command(
    name = "lpx",
    author,
    version,
    about = "LPX - reference-data cache tooling",
    long_about = "Inspect LPX cache configuration and exercise the shared data provider\nagainst a simulated reference-data backend."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Configuration file (overrides ./.lpxrc and ~/.lpx/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a simulated workload through a data provider
    ///
    /// Requests every well-known cache key for a number of rounds, with
    /// several concurrent callers per key, then reports per-key request
    /// state and cache statistics.
    Simulate(SimulateArgs),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn parse_level(level: &str) -> Level {
    match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let cli_config = config::load_config(args.config.as_deref())?;

    // Initialize tracing (CLI flag takes precedence over config)
    let level = args
        .log_level
        .as_deref()
        .or(cli_config.log_level.as_deref())
        .map_or(Level::WARN, parse_level);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Simulate(simulate_args) => {
            commands::simulate::execute(&cli_config, simulate_args).await
        }
        Command::Config(cmd) => commands::config::execute(&cli_config, cmd),
    }
}
