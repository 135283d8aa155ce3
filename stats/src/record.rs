//! Row types for the monetary ledgers behind the stats.
//!
//! These are the column-projected shapes the data source actually hands
//! back: a deposit is just its `amount`, an outbound transaction just
//! its `value`. Amounts travel as base-10 integer strings — wei totals
//! overflow every numeric type JSON can carry losslessly, and a string
//! survives the trip intact.

use std::fmt;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

// ---------------------------------------------------------------------------
// TxStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of an outbound multisig transaction.
///
/// A transaction is proposed, gathers owner approvals, and is finally
/// executed on chain (or never makes it). Only [`TxStatus::Executed`]
/// means QUAI actually left a vault, so only executed rows count toward
/// the withdrawal total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Proposed, waiting for owner signatures.
    Pending,
    /// Enough signatures collected, not yet broadcast.
    Approved,
    /// Broadcast and confirmed on chain. Money has moved.
    Executed,
    /// Withdrawn by the proposer or rejected by the owners.
    Cancelled,
}

impl TxStatus {
    /// The wire spelling used in status-column filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Executed => "executed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Ledger Rows
// ---------------------------------------------------------------------------

/// A deposit row projected down to its amount column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// Wei received, as a base-10 integer string. Nullable upstream.
    #[serde(default)]
    pub amount: Option<String>,
}

impl DepositRecord {
    /// A deposit of the given wei amount.
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: Some(amount.into()),
        }
    }

    /// The recorded amount as an integer. Missing and empty cells count
    /// as zero; anything else that fails to parse is an error.
    pub fn wei_amount(&self) -> Result<BigUint, SourceError> {
        parse_wei("amount", &self.amount)
    }
}

/// An outbound transaction row projected down to its value column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutflowRecord {
    /// Wei sent out, as a base-10 integer string. Nullable upstream.
    #[serde(default)]
    pub value: Option<String>,
}

impl OutflowRecord {
    /// An outflow of the given wei value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// The recorded value as an integer, with the same missing/empty
    /// rules as [`DepositRecord::wei_amount`].
    pub fn wei_value(&self) -> Result<BigUint, SourceError> {
        parse_wei("value", &self.value)
    }
}

/// Shared parsing rule for amount cells.
fn parse_wei(column: &'static str, cell: &Option<String>) -> Result<BigUint, SourceError> {
    match cell.as_deref() {
        None | Some("") => Ok(BigUint::default()),
        Some(s) => s.parse::<BigUint>().map_err(|_| SourceError::InvalidAmount {
            column,
            value: s.to_string(),
        }),
    }
}
