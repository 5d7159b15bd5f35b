//! rkt-dump - collect rkt pod state for offline triage
//!
//! Starts `rkt api-service`, lists every pod, and writes one archive entry
//! per pod. With `--danger`, journal collection commands for running pods are
//! emitted as JSON for the dump's command executor.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rkt_collector::RktCollector;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod dump;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON lines
    Json,
}

/// Collect rkt pod state into a diagnostic archive
#[derive(Debug, Parser)]
#[command(name = "rkt-dump")]
#[command(author, version, about = "Collect rkt pod state into a diagnostic archive", long_about = None)]
pub struct Cli {
    /// Configuration file (toml, yaml or json)
    #[arg(long, short, env = "RKT_DUMP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Include pod journals, which may contain sensitive information
    #[arg(long)]
    pub danger: bool,

    /// Archive to write pod entries to
    #[arg(long, short, default_value = "rkt-pods.tar")]
    pub output: PathBuf,

    /// Where to write log collection commands (stdout if omitted)
    #[arg(long)]
    pub commands: Option<PathBuf>,

    /// Log output format
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).init(),
        LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let mut settings = config::load(cli.config.as_deref())?;
    if cli.danger {
        settings.danger = true;
    }
    info!(
        executable = %settings.executable,
        endpoint = %settings.api_endpoint,
        danger = settings.danger,
        "Starting rkt-dump"
    );

    let mut collector = RktCollector::from_config(&settings);
    let collection = collector
        .collect()
        .await
        .context("rkt pod collection failed")?;

    dump::write_archive(&cli.output, &collection)?;
    if settings.danger {
        dump::write_commands(cli.commands.as_deref(), &collection.log_commands)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["rkt-dump"]).unwrap();
        assert!(!cli.danger);
        assert_eq!(cli.output, PathBuf::from("rkt-pods.tar"));
        assert!(cli.commands.is_none());
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "rkt-dump",
            "--danger",
            "-o",
            "/tmp/out.tar",
            "--commands",
            "/tmp/commands.json",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert!(cli.danger);
        assert_eq!(cli.output, PathBuf::from("/tmp/out.tar"));
        assert_eq!(cli.commands, Some(PathBuf::from("/tmp/commands.json")));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["rkt-dump", "--log-format", "xml"]).is_err());
    }
}
