use crate::adapters::http::DEFAULT_API_ENDPOINT;
use crate::core::{ConfigProvider, FieldMapping};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Parser)]
#[command(name = "crop-prices")]
#[command(about = "Crop market price proxy with a static fallback list")]
#[command(version)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "CROP_PRICES_API_ENDPOINT", default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, env = "DATA_GOV_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = "20")]
    pub limit: usize,

    #[arg(long, default_value = "8")]
    pub timeout_seconds: u64,

    #[arg(long, env = "CROP_PRICES_BIND_ADDRESS", default_value = "0.0.0.0:3000")]
    pub bind_address: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Run one fetch cycle and print the response body
    Fetch,
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("command", &self.command)
            .field("config", &self.config)
            .field("api_endpoint", &self.api_endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("limit", &self.limit)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("bind_address", &self.bind_address)
            .field("verbose", &self.verbose)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn record_limit(&self) -> usize {
        self.limit
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn bind_address(&self) -> &str {
        &self.bind_address
    }

    fn field_mapping(&self) -> FieldMapping {
        FieldMapping::default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_endpoint", &self.api_endpoint)?;
        validation::validate_secret("api_key", self.api_key.as_deref())?;
        validation::validate_range("limit", self.limit, 1, 1000)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 60)?;
        validation::validate_socket_addr("bind_address", &self.bind_address)?;
        Ok(())
    }
}
