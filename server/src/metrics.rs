//! # Prometheus Metrics
//!
//! Operational metrics for the stats service, scraped at the `/metrics`
//! HTTP endpoint on the configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so
//! they do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the service.
///
/// Clone-friendly (wraps `Arc` internally via prometheus handles) so it
/// can be shared across request handlers.
#[derive(Clone)]
pub struct StatsMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Total number of `/stats` requests served.
    pub stats_requests_total: IntCounter,
    /// Snapshots served without live data (placeholder responses).
    pub placeholders_served_total: IntCounter,
    /// Vault count from the most recent live snapshot.
    pub wallet_count: IntGauge,
    /// Histogram of end-to-end aggregation latency in seconds.
    pub aggregation_duration_seconds: Histogram,
}

impl StatsMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("quaivault".into()), None)
            .expect("failed to create prometheus registry");

        let stats_requests_total = IntCounter::new(
            "stats_requests_total",
            "Total number of /stats requests served",
        )
        .expect("metric creation");
        registry
            .register(Box::new(stats_requests_total.clone()))
            .expect("metric registration");

        let placeholders_served_total = IntCounter::new(
            "placeholders_served_total",
            "Snapshots served without live data",
        )
        .expect("metric creation");
        registry
            .register(Box::new(placeholders_served_total.clone()))
            .expect("metric registration");

        let wallet_count = IntGauge::new(
            "wallet_count",
            "Vault count from the most recent live snapshot",
        )
        .expect("metric creation");
        registry
            .register(Box::new(wallet_count.clone()))
            .expect("metric registration");

        let aggregation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "aggregation_duration_seconds",
                "End-to-end stats aggregation latency in seconds",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(aggregation_duration_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            stats_requests_total,
            placeholders_served_total,
            wallet_count,
            aggregation_duration_seconds,
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("prometheus output is valid utf-8"))
    }
}

impl Default for StatsMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<StatsMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails (should never happen in practice).
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = StatsMetrics::new();
        metrics.stats_requests_total.inc();
        metrics.placeholders_served_total.inc();
        metrics.wallet_count.set(17);

        let body = metrics.encode().unwrap();
        assert!(body.contains("quaivault_stats_requests_total 1"));
        assert!(body.contains("quaivault_placeholders_served_total 1"));
        assert!(body.contains("quaivault_wallet_count 17"));
    }

    #[test]
    fn registries_are_independent() {
        // Two instances must not double-register or share counts.
        let a = StatsMetrics::new();
        let b = StatsMetrics::new();
        a.stats_requests_total.inc();
        assert_eq!(b.stats_requests_total.get(), 0);
    }
}
