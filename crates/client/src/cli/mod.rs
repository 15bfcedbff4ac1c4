//! CLI command definitions.

pub mod items;
pub mod tables;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dynamap::Config;

/// Provision and inspect DynamoDB tables described by a dynamap schema file.
#[derive(Debug, Parser)]
#[command(name = "dynamap")]
#[command(about = "Provision and inspect dynamap tables", long_about = None)]
pub struct Cli {
    /// Schema file mapping entity names to table metadata.
    #[arg(long, env = "DYNAMAP_SCHEMA", default_value = "dynamap.json")]
    pub schema: PathBuf,

    /// Custom DynamoDB endpoint (for local DynamoDB).
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// AWS region.
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Connection settings from the environment, overridden by flags.
    pub fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(endpoint_url) = &self.endpoint_url {
            config = config.with_endpoint_url(endpoint_url);
        }
        if let Some(region) = &self.region {
            config = config.with_region(region);
        }
        config
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Table provisioning.
    Tables(tables::TablesCommand),
    /// Item reads and writes.
    Items(items::ItemsCommand),
}
