//! aodh - Command-line client for the Aodh alarming service
//!
//! Translates subcommands into Aodh v2 API calls and renders the results
//! as tables, JSON or YAML.

mod alarm;
mod alarm_history;
mod capabilities;
mod output;

use anyhow::{Context, Result};
use aodh_client::{Client, ClientConfig, ConfigOverrides};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::alarm::AlarmCommands;
use crate::alarm_history::AlarmHistoryCommands;
use crate::capabilities::CapabilitiesCommands;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "aodh")]
#[command(about = "Command-line client for the Aodh alarming service")]
#[command(long_about = "Command-line client for the Aodh alarming service

Alarms:
  alarm create         Create an alarm
  alarm list           List alarms, filtered by field values
  alarm query          Query alarms with a complex query expression
  alarm show           Show an alarm by id or name
  alarm update         Update an alarm
  alarm delete         Delete an alarm
  alarm state get|set  Get or set the state of an alarm

History:
  alarm-history search Show history for all alarms based on query
  alarm-history show   Show history for an alarm

Examples:
  aodh alarm list --filter type=threshold
  aodh alarm create --name cpu-high -t threshold -m cpu_util --threshold 80
  aodh alarm update <id> --threshold 90
  aodh alarm-history show <id>

Connection settings come from aodh.toml/aodh.yaml/aodh.json, AODH_* environment
variables and the flags below, in increasing priority.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (toml, yaml or json)
    #[arg(long = "config", global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Aodh endpoint, e.g. http://localhost:8042
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Pre-issued auth token, sent as X-Auth-Token
    #[arg(long, global = true)]
    auth_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage alarms
    #[command(subcommand)]
    Alarm(AlarmCommands),

    /// Inspect alarm history
    #[command(subcommand)]
    AlarmHistory(AlarmHistoryCommands),

    /// Show service capabilities
    #[command(subcommand)]
    Capabilities(CapabilitiesCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure colored output
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Initialize logging; RUST_LOG wins over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let overrides = ConfigOverrides {
        endpoint: cli.endpoint.clone(),
        auth_token: cli.auth_token.clone(),
        timeout_secs: cli.timeout,
        insecure: cli.insecure.then_some(true),
    };
    let config = ClientConfig::load(cli.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;
    debug!("Using Aodh endpoint {}", config.endpoint);

    let client = Client::new(&config)?;

    let result = match cli.command {
        Commands::Alarm(cmd) => alarm::handle_command(cmd, &client, cli.format).await,
        Commands::AlarmHistory(cmd) => alarm_history::handle_command(cmd, &client, cli.format).await,
        Commands::Capabilities(cmd) => capabilities::handle_command(cmd, &client, cli.format).await,
    };

    if let Err(e) = &result {
        if let Some(aodh_err) = e.downcast_ref::<errors::AodhError>() {
            debug!(
                "{} ({}, {:?})",
                aodh_err.error_code(),
                aodh_err.status_code(),
                aodh_err.category()
            );
        }
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_history_show_requires_alarm_id() {
        let result = Cli::try_parse_from(["aodh", "alarm-history", "show"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "aodh",
            "alarm",
            "list",
            "--filter",
            "type=event",
            "-f",
            "json",
            "--endpoint",
            "http://aodh:8042",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.endpoint.as_deref(), Some("http://aodh:8042"));
    }

    #[test]
    fn test_show_needs_id_or_name_but_not_both() {
        assert!(Cli::try_parse_from(["aodh", "alarm", "show"]).is_err());
        assert!(Cli::try_parse_from(["aodh", "alarm", "show", "a-1", "--name", "x"]).is_err());
        assert!(Cli::try_parse_from(["aodh", "alarm", "show", "--name", "cpu-high"]).is_ok());
    }

    #[test]
    fn test_state_set_parses_state() {
        let cli = Cli::try_parse_from([
            "aodh",
            "alarm",
            "state",
            "set",
            "a-1",
            "--state",
            "insufficient data",
        ])
        .unwrap();
        match cli.command {
            Commands::Alarm(AlarmCommands::State(alarm::StateCommands::Set { state, .. })) => {
                assert_eq!(state, aodh_model::AlarmState::InsufficientData);
            },
            _ => panic!("unexpected command"),
        }
        assert!(Cli::try_parse_from(["aodh", "alarm", "state", "set", "a-1", "--state", "on"]).is_err());
    }

    #[test]
    fn test_create_flags_parse() {
        let cli = Cli::try_parse_from([
            "aodh",
            "alarm",
            "create",
            "--name",
            "cpu-high",
            "-t",
            "threshold",
            "-m",
            "cpu_util",
            "--threshold",
            "80",
            "--comparison-operator",
            "ge",
            "--alarm-action",
            "log://",
            "--alarm-action",
            "http://hook",
            "--time-constraint",
            "name=nightly;start=0 23 * * *;duration=3600",
        ])
        .unwrap();
        let Commands::Alarm(AlarmCommands::Create { fields }) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(fields.alarm_actions.len(), 2);
        assert_eq!(fields.time_constraints[0].duration, 3600);
        assert_eq!(
            fields.comparison_operator,
            Some(aodh_model::ComparisonOperator::Ge)
        );
    }
}
