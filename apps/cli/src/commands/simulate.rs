//! Simulated workload through a shared data provider.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{Cell, Color, Table};
use futures::future::join_all;
use lpx_cache::CacheStats;
use lpx_data::{DataProvider, FetchMode, RequestState, keys, spawn_configured_sweeper};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::CliConfig;
use crate::source::{MockSource, ReferenceSource};

/// Arguments for `lpx simulate`
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of rounds over the full key set
    #[arg(short = 'n', long, default_value = "3")]
    pub rounds: usize,

    /// Concurrent callers per key in each round
    #[arg(long, default_value = "4")]
    pub concurrency: usize,

    /// Share of backend calls that fail (0.0 - 1.0)
    #[arg(long, default_value = "0.0", value_parser = parse_failure_rate)]
    pub failure_rate: f64,

    /// Simulated backend latency in milliseconds
    #[arg(long, default_value = "10")]
    pub latency_ms: u64,

    /// Coalesce concurrent fetches for the same key
    #[arg(long)]
    pub single_flight: bool,

    /// Key to invalidate after every round (repeatable)
    #[arg(long = "invalidate", value_name = "KEY")]
    pub invalidate: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct KeyReport {
    key: String,
    #[serde(flatten)]
    state: RequestState,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    fetch_mode: FetchMode,
    rounds: usize,
    callers_per_key: usize,
    requests: usize,
    failures: usize,
    backend_calls: u64,
    stats: CacheStats,
    keys: Vec<KeyReport>,
}

/// Execute simulate command
pub async fn execute(config: &CliConfig, args: SimulateArgs) -> Result<()> {
    let mut provider_config = config.provider_config();
    if args.single_flight {
        provider_config.fetch_mode = FetchMode::SingleFlight;
    }

    let provider =
        Arc::new(DataProvider::new(provider_config).context("Invalid provider configuration")?);
    let sweeper = spawn_configured_sweeper(&provider);
    let source: Arc<dyn ReferenceSource> = Arc::new(MockSource::new(
        Duration::from_millis(args.latency_ms),
        args.failure_rate,
    ));

    let workload = workload_keys();
    let mut requests = 0;
    let mut failures = 0;

    for round in 0..args.rounds {
        let provider_ref = &provider;
        let source_ref = &source;

        let calls = workload
            .iter()
            .flat_map(|key| std::iter::repeat_n(key.as_str(), args.concurrency))
            .map(move |key| async move {
                provider_ref
                    .get_cached_data(key, || source_ref.fetch(key))
                    .await
            });
        let results = join_all(calls).await;

        let round_failures = results.iter().filter(|r| r.is_err()).count();
        requests += results.len();
        failures += round_failures;

        for key in &args.invalidate {
            provider.invalidate_cache(key);
        }

        info!(round, requests = results.len(), failures = round_failures, "Round complete");
    }

    if let Some(handle) = sweeper {
        handle.abort();
    }

    let report = SimulationReport {
        fetch_mode: provider.config().fetch_mode,
        rounds: args.rounds,
        callers_per_key: args.concurrency,
        requests,
        failures,
        backend_calls: source.calls(),
        stats: provider.stats(),
        keys: workload
            .iter()
            .map(|key| KeyReport {
                key: key.clone(),
                state: provider.request_state(key),
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn parse_failure_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;

    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("'{value}' is not between 0.0 and 1.0"))
    }
}

/// The registry keys plus one instance of each dynamic key.
fn workload_keys() -> Vec<String> {
    let mut workload: Vec<String> = keys::ALL
        .iter()
        .filter(|key| **key != keys::SKILLS_BY_IDS && **key != keys::USER_PROJECTS)
        .map(|key| (*key).to_string())
        .collect();

    workload.extend(keys::skills_by_ids_key(&["3", "1", "2"]));
    workload.push(keys::user_projects_key("demo-user"));
    workload
}

fn print_report(report: &SimulationReport) {
    println!("{}", "Simulation Results".bold().cyan());
    println!(
        "  Mode: {:?}  Rounds: {}  Callers per key: {}",
        report.fetch_mode, report.rounds, report.callers_per_key
    );
    println!();

    let mut table = Table::new();
    table.set_header(vec!["Key", "Loading", "Last error"]);

    for entry in &report.keys {
        let error_cell = match entry.state.error {
            Some(ref message) => Cell::new(message).fg(Color::Red),
            None => Cell::new("-"),
        };
        table.add_row(vec![
            Cell::new(&entry.key),
            Cell::new(entry.state.loading.to_string()),
            error_cell,
        ]);
    }

    println!("{}", table);
    println!();
    println!(
        "  Requests: {}  Failures: {}  Backend calls: {}",
        report.requests, report.failures, report.backend_calls
    );
    println!(
        "  {} hits: {}  misses: {}  size: {}  hit rate: {:.1}%",
        "✓".green(),
        report.stats.hits,
        report.stats.misses,
        report.stats.size,
        report.stats.hit_rate * 100.0
    );
}
