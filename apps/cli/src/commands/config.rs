//! Configuration inspection commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::config::CliConfig;

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute config command
pub fn execute(config: &CliConfig, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_command(config, json),
    }
}

fn show_command(config: &CliConfig, json: bool) -> Result<()> {
    let provider = config.provider_config();

    if json {
        let resolved = CliConfig {
            log_level: config.log_level.clone(),
            provider: Some(provider),
        };
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!("{}", "Resolved configuration".bold().cyan());
    println!();
    println!("  Log level:      {}", config.log_level.as_deref().unwrap_or("warn"));
    println!("  Default TTL:    {} ms", provider.cache.default_ttl_ms);
    println!("  Max cache size: {}", provider.cache.max_cache_size);
    println!("  Fetch mode:     {:?}", provider.fetch_mode);
    match provider.sweep_interval() {
        Some(interval) => println!("  Expiry sweep:   every {}s", interval.as_secs()),
        None => println!("  Expiry sweep:   {}", "lazy only".dimmed()),
    }

    Ok(())
}
