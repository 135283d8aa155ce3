//! In-memory stats backend.
//!
//! Serves canned ledger data straight from process memory, with
//! per-query failure injection. This is the pipeline's equivalent of a
//! temporary database: every test builds exactly the world it needs and
//! throws it away. Also useful for driving the server locally without a
//! Supabase project.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::record::{DepositRecord, OutflowRecord, TxStatus};
use crate::source::StatsSource;

/// A [`StatsSource`] backed by plain vectors.
///
/// Built with a fluent constructor:
///
/// ```
/// use quaivault_stats::record::TxStatus;
/// use quaivault_stats::source::MemorySource;
///
/// let source = MemorySource::new()
///     .with_vaults(3)
///     .with_deposit("3000000000000000000")
///     .with_transaction(TxStatus::Executed, "1000000000000000000")
///     .with_transaction(TxStatus::Pending, "999");
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    vaults: u64,
    deposits: Vec<DepositRecord>,
    transactions: Vec<(TxStatus, OutflowRecord)>,
    fail_count: bool,
    fail_deposits: bool,
    fail_outflows: bool,
}

impl MemorySource {
    /// An empty source: zero vaults, empty ledgers, nothing failing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vault-count answer.
    pub fn with_vaults(mut self, count: u64) -> Self {
        self.vaults = count;
        self
    }

    /// Appends a deposit row with the given wei amount string.
    pub fn with_deposit(mut self, amount: &str) -> Self {
        self.deposits.push(DepositRecord::new(amount));
        self
    }

    /// Appends a deposit row whose amount cell is missing.
    pub fn with_null_deposit(mut self) -> Self {
        self.deposits.push(DepositRecord { amount: None });
        self
    }

    /// Appends an outbound transaction row. Only rows with
    /// [`TxStatus::Executed`] show up in the outflow query, same as the
    /// status filter upstream.
    pub fn with_transaction(mut self, status: TxStatus, value: &str) -> Self {
        self.transactions.push((status, OutflowRecord::new(value)));
        self
    }

    /// Makes the vault-count query fail.
    pub fn failing_counts(mut self) -> Self {
        self.fail_count = true;
        self
    }

    /// Makes the deposit query fail.
    pub fn failing_deposits(mut self) -> Self {
        self.fail_deposits = true;
        self
    }

    /// Makes the outflow query fail.
    pub fn failing_outflows(mut self) -> Self {
        self.fail_outflows = true;
        self
    }
}

#[async_trait]
impl StatsSource for MemorySource {
    async fn vault_count(&self) -> Result<u64, SourceError> {
        if self.fail_count {
            return Err(SourceError::Unavailable("injected count failure".into()));
        }
        Ok(self.vaults)
    }

    async fn deposit_amounts(&self) -> Result<Vec<DepositRecord>, SourceError> {
        if self.fail_deposits {
            return Err(SourceError::Unavailable("injected deposit failure".into()));
        }
        Ok(self.deposits.clone())
    }

    async fn executed_outflows(&self) -> Result<Vec<OutflowRecord>, SourceError> {
        if self.fail_outflows {
            return Err(SourceError::Unavailable("injected outflow failure".into()));
        }
        Ok(self
            .transactions
            .iter()
            .filter(|(status, _)| *status == TxStatus::Executed)
            .map(|(_, row)| row.clone())
            .collect())
    }
}
