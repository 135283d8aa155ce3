// Copyright (c) 2026 Quai Vault Contributors. MIT License.
// See LICENSE for details.

//! # Quai Vault Stats Service
//!
//! Entry point for the `quaivault-statsd` binary. Parses CLI arguments,
//! initializes logging and metrics, and serves the stats HTTP API that
//! quaivault.org's front page reads.
//!
//! The binary supports three subcommands:
//!
//! - `run`     — start the HTTP service
//! - `fetch`   — run one aggregation and print the JSON snapshot
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use quaivault_stats::aggregate::StatsAggregator;

use cli::{Commands, StatsdCli};
use logging::LogFormat;
use metrics::StatsMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = StatsdCli::parse();

    match cli.command {
        Commands::Run(args) => run_service(args).await,
        Commands::Fetch(args) => fetch_once(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the full service: stats API and metrics endpoint.
async fn run_service(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "quaivault_statsd=info,quaivault_stats=info,tower_http=info",
        LogFormat::from_str_lossy(&args.log_format),
    );

    let config = args.source.to_config();
    if config.is_configured() {
        tracing::info!(schema = %config.schema, "data source configured");
    } else {
        tracing::warn!("no data source configured, stats will be placeholders");
    }

    tracing::info!(
        http_port = args.http_port,
        metrics_port = args.metrics_port,
        "starting quaivault-statsd"
    );

    // --- Aggregation pipeline ---
    let aggregator = Arc::new(StatsAggregator::from_config(&config));

    // --- Metrics ---
    let service_metrics = Arc::new(StatsMetrics::new());

    // --- Application state ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        configured: config.is_configured(),
        aggregator,
        metrics: Arc::clone(&service_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.http_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("stats API listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&service_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("quaivault-statsd stopped");
    Ok(())
}

/// Runs one aggregation against the configured source and prints the
/// snapshot as pretty JSON on stdout. Logs stay on stderr, so the
/// output pipes cleanly into `jq`.
async fn fetch_once(args: cli::FetchArgs) -> Result<()> {
    logging::init_logging(
        "quaivault_statsd=warn,quaivault_stats=warn",
        LogFormat::Pretty,
    );

    let config = args.source.to_config();
    let aggregator = StatsAggregator::from_config(&config);
    let snapshot = aggregator.aggregate().await;

    let json =
        serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
    println!("{}", json);
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("quaivault-statsd {}", env!("CARGO_PKG_VERSION"));
    println!("rustc            {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
