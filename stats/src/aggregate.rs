//! # Vault Stats Aggregation
//!
//! Produces the [`VaultStats`] snapshot the site's hero section renders:
//! how many vaults exist, and how much QUAI they hold net of executed
//! withdrawals. One call, one snapshot, no state between calls.
//!
//! The aggregator is a total function: whatever the network does, the
//! caller gets a `VaultStats` back, never an error. Failures collapse
//! into the canonical placeholder (or a partially degraded snapshot, see
//! [`StatsAggregator::aggregate`]) and a log line — the public page
//! shows quiet zeroes, not a stack trace.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::error::SourceError;
use crate::format::format_quai_amount;
use crate::record::{DepositRecord, OutflowRecord};
use crate::source::{StatsSource, SupabaseSource};

// ---------------------------------------------------------------------------
// VaultStats
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of the publicly displayed vault statistics.
///
/// Snapshots have no identity and are never mutated: each aggregation
/// call builds a fresh one, the presentation layer renders it, and the
/// next call replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultStats {
    /// Number of deployed vaults known to the data source.
    pub wallet_count: u64,
    /// Net QUAI held across all vaults, already display-formatted.
    /// Kept as a string end to end — wei totals overflow every numeric
    /// type the wire format carries losslessly.
    pub total_secured: String,
    /// `true` iff this snapshot came from live data rather than the
    /// placeholder default. Drives the "live" badge on the page.
    pub is_live: bool,
}

impl VaultStats {
    /// The canonical placeholder: zero vaults, zero QUAI, not live.
    /// Served whenever live data cannot be had.
    pub fn placeholder() -> Self {
        Self {
            wallet_count: 0,
            total_secured: "0".to_string(),
            is_live: false,
        }
    }
}

// ---------------------------------------------------------------------------
// StatsAggregator
// ---------------------------------------------------------------------------

/// Turns three ledger queries into one [`VaultStats`] snapshot.
///
/// Holds the data source as an `Option` — the capability handle is
/// decided once at construction, and the presence check is the first
/// thing every aggregation does. A disconnected aggregator never issues
/// a network call.
pub struct StatsAggregator<S> {
    source: Option<S>,
}

impl StatsAggregator<SupabaseSource> {
    /// Builds the production aggregator. With an unconfigured
    /// [`StatsConfig`] this yields a disconnected aggregator that serves
    /// placeholders, which is exactly what an undeployed preview
    /// environment wants.
    pub fn from_config(config: &StatsConfig) -> Self {
        Self {
            source: SupabaseSource::from_config(config),
        }
    }
}

impl<S: StatsSource> StatsAggregator<S> {
    /// Aggregator over an explicit source.
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Aggregator with no source at all.
    pub fn disconnected() -> Self {
        Self { source: None }
    }

    /// `true` iff a data source is attached.
    pub fn is_connected(&self) -> bool {
        self.source.is_some()
    }

    /// Produces a fresh snapshot.
    ///
    /// Failure ladder, first match wins:
    ///
    /// | condition | result |
    /// |---|---|
    /// | no source attached | full placeholder, no queries issued |
    /// | vault count query fails | full placeholder |
    /// | deposit query fails | real count, `"0"` secured, still live |
    /// | any amount fails to parse | full placeholder |
    /// | everything succeeds | real count, net total, live |
    ///
    /// An outflow *query* failure is absent from the ladder on purpose:
    /// only the deposit error channel is inspected, and a failed outflow
    /// query is indistinguishable from "no executed transactions".
    pub async fn aggregate(&self) -> VaultStats {
        let Some(source) = &self.source else {
            tracing::warn!("data source not configured, serving placeholder stats");
            return VaultStats::placeholder();
        };

        let wallet_count = match source.vault_count().await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("vault count query failed: {}", e);
                return VaultStats::placeholder();
            }
        };

        // Both monetary queries go out together; the net figure is not
        // computed until both have settled.
        let (deposits, outflows) =
            tokio::join!(source.deposit_amounts(), source.executed_outflows());

        let deposits = match deposits {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("deposit query failed: {}", e);
                // The count already succeeded and survives; only the
                // monetary figure degrades to zero.
                return VaultStats {
                    wallet_count,
                    total_secured: "0".to_string(),
                    is_live: true,
                };
            }
        };

        // Outflow errors collapse to an empty row set. See above.
        let outflows = outflows.unwrap_or_default();

        match net_secured_wei(&deposits, &outflows) {
            Ok(net) => {
                let snapshot = VaultStats {
                    wallet_count,
                    total_secured: format_quai_amount(&net),
                    is_live: true,
                };
                tracing::debug!(
                    wallet_count = snapshot.wallet_count,
                    total_secured = %snapshot.total_secured,
                    "vault stats aggregated"
                );
                snapshot
            }
            Err(e) => {
                tracing::error!("vault stats aggregation failed: {}", e);
                VaultStats::placeholder()
            }
        }
    }
}

/// Net wei secured across all vaults: deposits minus executed outflows,
/// floored at zero. Withdrawals can transiently exceed recorded deposits
/// when the indexer is mid-backfill; a negative public number is never
/// the right answer to that.
fn net_secured_wei(
    deposits: &[DepositRecord],
    outflows: &[OutflowRecord],
) -> Result<BigUint, SourceError> {
    let mut deposited = BigUint::default();
    for row in deposits {
        deposited += row.wei_amount()?;
    }

    let mut withdrawn = BigUint::default();
    for row in outflows {
        withdrawn += row.wei_value()?;
    }

    Ok(if deposited > withdrawn {
        deposited - withdrawn
    } else {
        BigUint::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TxStatus;
    use crate::source::MemorySource;

    const ONE_QUAI: &str = "1000000000000000000";
    const TWO_QUAI: &str = "2000000000000000000";
    const THREE_QUAI: &str = "3000000000000000000";

    #[tokio::test]
    async fn disconnected_aggregator_serves_placeholder() {
        let agg: StatsAggregator<MemorySource> = StatsAggregator::disconnected();
        assert!(!agg.is_connected());
        assert_eq!(agg.aggregate().await, VaultStats::placeholder());
    }

    #[tokio::test]
    async fn unconfigured_config_yields_disconnected_aggregator() {
        // No endpoint, no credential — no client is ever constructed,
        // so no network call can be issued.
        let agg = StatsAggregator::from_config(&StatsConfig::unconfigured());
        assert!(!agg.is_connected());
        assert_eq!(agg.aggregate().await, VaultStats::placeholder());
    }

    #[tokio::test]
    async fn count_failure_degrades_fully() {
        // Even with perfectly good ledger data behind it.
        let source = MemorySource::new()
            .with_deposit(THREE_QUAI)
            .failing_counts();
        let stats = StatsAggregator::new(source).aggregate().await;
        assert_eq!(stats, VaultStats::placeholder());
    }

    #[tokio::test]
    async fn deposit_failure_keeps_the_count() {
        let source = MemorySource::new().with_vaults(5).failing_deposits();
        let stats = StatsAggregator::new(source).aggregate().await;
        assert_eq!(
            stats,
            VaultStats {
                wallet_count: 5,
                total_secured: "0".to_string(),
                is_live: true,
            }
        );
    }

    #[tokio::test]
    async fn net_total_subtracts_executed_outflows() {
        let source = MemorySource::new()
            .with_vaults(2)
            .with_deposit(THREE_QUAI)
            .with_transaction(TxStatus::Executed, ONE_QUAI);
        let stats = StatsAggregator::new(source).aggregate().await;
        assert_eq!(stats.wallet_count, 2);
        assert_eq!(stats.total_secured, "2");
        assert!(stats.is_live);
    }

    #[tokio::test]
    async fn non_executed_transactions_do_not_count() {
        let source = MemorySource::new()
            .with_vaults(1)
            .with_deposit(THREE_QUAI)
            .with_transaction(TxStatus::Pending, ONE_QUAI)
            .with_transaction(TxStatus::Approved, ONE_QUAI)
            .with_transaction(TxStatus::Cancelled, ONE_QUAI);
        let stats = StatsAggregator::new(source).aggregate().await;
        assert_eq!(stats.total_secured, "3");
    }

    #[tokio::test]
    async fn excess_withdrawals_clamp_to_zero() {
        let source = MemorySource::new()
            .with_vaults(1)
            .with_deposit(ONE_QUAI)
            .with_transaction(TxStatus::Executed, TWO_QUAI);
        let stats = StatsAggregator::new(source).aggregate().await;
        assert_eq!(stats.total_secured, "0");
        assert!(stats.is_live, "clamped totals are still live data");
    }

    #[tokio::test]
    async fn outflow_query_failure_counts_as_no_withdrawals() {
        // Pins the asymmetry: the outflow error channel is never
        // inspected, so a failed query sums as zero withdrawn and the
        // reported total is deposits alone.
        let source = MemorySource::new()
            .with_vaults(4)
            .with_deposit(THREE_QUAI)
            .failing_outflows();
        let stats = StatsAggregator::new(source).aggregate().await;
        assert_eq!(
            stats,
            VaultStats {
                wallet_count: 4,
                total_secured: "3".to_string(),
                is_live: true,
            }
        );
    }

    #[tokio::test]
    async fn null_and_empty_amounts_sum_as_zero() {
        let source = MemorySource::new()
            .with_vaults(3)
            .with_deposit(ONE_QUAI)
            .with_null_deposit()
            .with_deposit("");
        let stats = StatsAggregator::new(source).aggregate().await;
        assert_eq!(stats.total_secured, "1");
    }

    #[tokio::test]
    async fn malformed_amount_degrades_fully() {
        // A parse failure is not a query failure: it falls through to
        // the outermost handler and takes the count down with it.
        let source = MemorySource::new()
            .with_vaults(9)
            .with_deposit(ONE_QUAI)
            .with_deposit("not-a-number");
        let stats = StatsAggregator::new(source).aggregate().await;
        assert_eq!(stats, VaultStats::placeholder());
    }

    #[tokio::test]
    async fn malformed_outflow_value_also_degrades_fully() {
        let source = MemorySource::new()
            .with_vaults(1)
            .with_deposit(ONE_QUAI)
            .with_transaction(TxStatus::Executed, "garbage");
        let stats = StatsAggregator::new(source).aggregate().await;
        assert_eq!(stats, VaultStats::placeholder());
    }

    #[tokio::test]
    async fn aggregation_is_idempotent_over_a_static_source() {
        let source = MemorySource::new()
            .with_vaults(6)
            .with_deposit(THREE_QUAI)
            .with_transaction(TxStatus::Executed, ONE_QUAI);
        let agg = StatsAggregator::new(source);
        let first = agg.aggregate().await;
        let second = agg.aggregate().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_ledgers_are_live_zeroes() {
        // A configured source over an empty project is live, unlike the
        // placeholder — the badge distinguishes "really zero" from
        // "couldn't ask".
        let stats = StatsAggregator::new(MemorySource::new()).aggregate().await;
        assert_eq!(stats.wallet_count, 0);
        assert_eq!(stats.total_secured, "0");
        assert!(stats.is_live);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let stats = VaultStats {
            wallet_count: 12,
            total_secured: "1,234.56".to_string(),
            is_live: true,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["walletCount"], 12);
        assert_eq!(json["totalSecured"], "1,234.56");
        assert_eq!(json["isLive"], true);
    }
}
