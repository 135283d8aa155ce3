//! Error types for the stats pipeline.
//!
//! Every fallible data-source operation returns a [`SourceError`]. None
//! of these ever reach a caller of the aggregator — they are absorbed
//! into placeholder or partially degraded snapshots — but the variants
//! keep the log lines precise about *which* leg of the pipeline fell over.

use thiserror::Error;

/// Errors that can occur while querying or interpreting the data source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level or HTTP-status failure from the REST interface.
    #[error("data source request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The count query came back without a usable `Content-Range` header.
    #[error("count query returned no content-range header")]
    MissingCount,

    /// The `Content-Range` header was present but not a number we could use.
    #[error("unparseable row count in content-range: {raw:?}")]
    InvalidCount {
        /// The raw header value as received.
        raw: String,
    },

    /// An amount column held something other than a base-10 integer.
    ///
    /// Missing and empty amounts are fine (they count as zero); this
    /// fires only for non-empty garbage, and it fails the whole
    /// aggregation rather than silently skipping the row.
    #[error("unparseable wei amount in {column} column: {value:?}")]
    InvalidAmount {
        /// The projected column the value came from.
        column: &'static str,
        /// The offending cell contents.
        value: String,
    },

    /// The backing store is unreachable or refused the query.
    ///
    /// Produced by non-HTTP sources (the in-memory backend uses it for
    /// injected failures).
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}
