//! # Data-Source Seam
//!
//! The aggregator doesn't care where the numbers come from; it cares
//! that three read queries exist. [`StatsSource`] is that contract:
//! an exact row count with zero row transfer, and two column-projected
//! row sets. The production implementation speaks PostgREST over HTTPS
//! ([`SupabaseSource`]); tests and local development use the in-memory
//! [`MemorySource`] and never touch a socket.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::record::{DepositRecord, OutflowRecord};

mod memory;
mod supabase;

pub use memory::MemorySource;
pub use supabase::SupabaseSource;

/// Read-only query surface over the vault ledger.
///
/// Each method is a single independent query. Implementations do not
/// retry, do not impose deadlines, and do not cache — one aggregation
/// attempt maps to exactly one query per method (spelled out here
/// because the caller's failure policy depends on it).
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Exact number of rows in the vaults table. No row data transfers.
    async fn vault_count(&self) -> Result<u64, SourceError>;

    /// The amount column of every deposit row.
    async fn deposit_amounts(&self) -> Result<Vec<DepositRecord>, SourceError>;

    /// The value column of outbound transactions whose status marks them
    /// as executed on chain.
    async fn executed_outflows(&self) -> Result<Vec<OutflowRecord>, SourceError>;
}
