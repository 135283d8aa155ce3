//! # CLI Interface
//!
//! Defines the command-line argument structure for `quaivault-statsd`
//! using `clap` derive. Supports three subcommands: `run`, `fetch`, and
//! `version`.

use clap::{Args, Parser, Subcommand};

use quaivault_stats::config::{
    StatsConfig, DEFAULT_SCHEMA, ENV_SUPABASE_ANON_KEY, ENV_SUPABASE_SCHEMA, ENV_SUPABASE_URL,
};

/// Quai Vault stats backend.
///
/// Aggregates vault statistics from the hosted ledger and serves them
/// to quaivault.org over HTTP. Runs happily without any data source
/// configured — it just answers with placeholder stats until one shows up.
#[derive(Parser, Debug)]
#[command(
    name = "quaivault-statsd",
    about = "Quai Vault stats backend service",
    version,
    propagate_version = true
)]
pub struct StatsdCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the stats binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP service.
    Run(RunArgs),
    /// Perform a single aggregation and print the JSON snapshot.
    Fetch(FetchArgs),
    /// Print version information and exit.
    Version,
}

/// Data-source connection flags, shared by `run` and `fetch`.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Supabase project URL, e.g. `https://abc123.supabase.co`.
    ///
    /// Leave unset to run without live data.
    #[arg(long, env = ENV_SUPABASE_URL)]
    pub supabase_url: Option<String>,

    /// Supabase anon API key. Read-only under row-level security.
    #[arg(long, env = ENV_SUPABASE_ANON_KEY, hide_env_values = true)]
    pub supabase_anon_key: Option<String>,

    /// Schema the stats tables live in.
    #[arg(long, env = ENV_SUPABASE_SCHEMA, default_value = DEFAULT_SCHEMA)]
    pub schema: String,
}

impl SourceArgs {
    /// Folds the flags into a [`StatsConfig`] value.
    pub fn to_config(&self) -> StatsConfig {
        StatsConfig::new(
            self.supabase_url.clone(),
            self.supabase_anon_key.clone(),
            self.schema.clone(),
        )
    }
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Port for the public stats API.
    #[arg(long, env = "QUAIVAULT_HTTP_PORT", default_value_t = 8080)]
    pub http_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "QUAIVAULT_METRICS_PORT", default_value_t = 9464)]
    pub metrics_port: u16,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "QUAIVAULT_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `fetch` subcommand.
#[derive(Parser, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}
