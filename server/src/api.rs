//! # REST API
//!
//! Builds the axum router that exposes the service's HTTP interface.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path      | Description                                  |
//! |--------|-----------|----------------------------------------------|
//! | GET    | `/health` | Liveness probe                               |
//! | GET    | `/status` | Service status summary                       |
//! | GET    | `/stats`  | Fresh [`VaultStats`] snapshot for the site   |
//!
//! `/stats` is the presentation boundary: the page calls it once per
//! visit and renders whatever comes back. It always answers 200 with a
//! snapshot — degraded states are data, not HTTP errors.

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use quaivault_stats::aggregate::{StatsAggregator, VaultStats};
use quaivault_stats::source::StatsSource;

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone — everything behind `Arc`. Generic over the data
/// source so the full router can be exercised against the in-memory
/// backend in tests.
pub struct AppState<S> {
    /// The service's reported version string.
    pub version: String,
    /// Whether a live data source is attached.
    pub configured: bool,
    /// The aggregation pipeline.
    pub aggregator: Arc<StatsAggregator<S>>,
    /// Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            version: self.version.clone(),
            configured: self.configured,
            aggregator: Arc::clone(&self.aggregator),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Response payload for `GET /status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Service software version.
    pub version: String,
    /// Whether a live data source is configured.
    pub configured: bool,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
///
/// CORS is wide open for GET — the whole point of this service is to be
/// called from a static site on another origin.
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: StatsSource + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler::<S>))
        .route("/stats", get(stats_handler::<S>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 if the service is alive.
///
/// This is the liveness probe for orchestrators. It intentionally does
/// not touch the data source — that's what `/stats` itself reports on,
/// in-band.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status` — returns a service status summary.
async fn status_handler<S: StatsSource>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let resp = StatusResponse {
        version: state.version.clone(),
        configured: state.configured,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    Json(resp)
}

/// `GET /stats` — runs one aggregation and returns the snapshot.
///
/// Never errors: an unreachable or unconfigured data source comes back
/// as the placeholder snapshot with `isLive: false`, and the page shows
/// quiet zeroes.
async fn stats_handler<S: StatsSource>(State(state): State<AppState<S>>) -> Json<VaultStats> {
    let timer = state.metrics.aggregation_duration_seconds.start_timer();
    let snapshot = state.aggregator.aggregate().await;
    timer.observe_duration();

    state.metrics.stats_requests_total.inc();
    if snapshot.is_live {
        state.metrics.wallet_count.set(snapshot.wallet_count as i64);
    } else {
        state.metrics.placeholders_served_total.inc();
    }

    Json(snapshot)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
