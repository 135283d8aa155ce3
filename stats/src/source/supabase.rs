//! # Supabase (PostgREST) Source
//!
//! Talks to the hosted Supabase project's auto-generated REST interface.
//! Three requests, all reads:
//!
//! | Query | Shape |
//! |---|---|
//! | vault count | `HEAD /rest/v1/vaults?select=*` with `Prefer: count=exact`; the total rides back in `Content-Range` |
//! | deposits | `GET /rest/v1/deposits?select=amount` |
//! | executed outflows | `GET /rest/v1/transactions?select=value&status=eq.executed` |
//!
//! Schema scoping uses the `Accept-Profile` header. Authentication is
//! the anon key, sent both as `apikey` and as a bearer token, which is
//! what PostgREST expects from browser-grade clients.
//!
//! There is deliberately no request timeout and no retry: a single
//! aggregation attempt maps to a single attempt per query, and the
//! caller owns any user-facing deadline.

use async_trait::async_trait;
use reqwest::RequestBuilder;

use crate::config::{StatsConfig, DEPOSITS_TABLE, TRANSACTIONS_TABLE, VAULTS_TABLE};
use crate::error::SourceError;
use crate::record::{DepositRecord, OutflowRecord, TxStatus};
use crate::source::StatsSource;

/// Read client for the Supabase REST surface.
pub struct SupabaseSource {
    client: reqwest::Client,
    /// Project REST root, e.g. `https://abc123.supabase.co/rest/v1`.
    rest_base: String,
    anon_key: String,
    schema: String,
}

impl SupabaseSource {
    /// Builds a source from explicit connection parts.
    pub fn new(base_url: &str, anon_key: &str, schema: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            rest_base: format!("{}/rest/v1", base_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
            schema: schema.to_string(),
        }
    }

    /// Builds a source from a [`StatsConfig`], or `None` when the config
    /// lacks an endpoint or credential. The absent case is the capability
    /// handle the aggregator checks before doing anything else.
    pub fn from_config(config: &StatsConfig) -> Option<Self> {
        let (url, key) = config.credentials()?;
        Some(Self::new(url, key, &config.schema))
    }

    /// The REST root this source queries. Handy for log lines.
    pub fn rest_base(&self) -> &str {
        &self.rest_base
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_base, table)
    }

    /// Stamps a request with auth and schema-profile headers.
    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept-Profile", &self.schema)
    }
}

#[async_trait]
impl StatsSource for SupabaseSource {
    async fn vault_count(&self) -> Result<u64, SourceError> {
        let response = self
            .prepare(self.client.head(self.table_url(VAULTS_TABLE)))
            .query(&[("select", "*")])
            .header("Prefer", "count=exact")
            .send()
            .await?
            .error_for_status()?;

        let raw = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or(SourceError::MissingCount)?;
        parse_content_range(raw)
    }

    async fn deposit_amounts(&self) -> Result<Vec<DepositRecord>, SourceError> {
        let rows = self
            .prepare(self.client.get(self.table_url(DEPOSITS_TABLE)))
            .query(&[("select", "amount")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows)
    }

    async fn executed_outflows(&self) -> Result<Vec<OutflowRecord>, SourceError> {
        let status_filter = format!("eq.{}", TxStatus::Executed);
        let rows = self
            .prepare(self.client.get(self.table_url(TRANSACTIONS_TABLE)))
            .query(&[("select", "value"), ("status", status_filter.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows)
    }
}

/// Pulls the total out of a PostgREST `Content-Range` value.
///
/// Exact counts arrive as `0-24/3573` (or `*/0` on an empty table); the
/// part after the slash is the number we want.
fn parse_content_range(raw: &str) -> Result<u64, SourceError> {
    let total = raw
        .rsplit_once('/')
        .map(|(_, total)| total)
        .ok_or_else(|| SourceError::InvalidCount {
            raw: raw.to_string(),
        })?;
    total.parse().map_err(|_| SourceError::InvalidCount {
        raw: raw.to_string(),
    })
}
