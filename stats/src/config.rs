//! # Stats Pipeline Configuration & Constants
//!
//! Every magic number in the stats pipeline lives here. If you're
//! hardcoding a table name or a decimal count somewhere else, you're
//! doing it wrong and you owe the team coffee.
//!
//! [`StatsConfig`] is an explicit value, not a process-wide singleton.
//! Construct it once at startup (usually via [`StatsConfig::from_env`])
//! and hand it to whatever needs it — the aggregator stays testable with
//! injected fake configurations.

use std::env;

// ---------------------------------------------------------------------------
// Asset Denomination
// ---------------------------------------------------------------------------

/// QUAI carries 18 decimal places, same as ether. Every amount that
/// crosses the data-source boundary is denominated in the smallest unit
/// (wei) and encoded as a base-10 integer string.
pub const QUAI_DECIMALS: u32 = 18;

/// How many fractional digits survive into the display string.
/// Two, truncated — never rounded. A vault holding just under a
/// hundredth of a QUAI shows as `"0"`, and that is intentional.
pub const DISPLAY_FRACTION_DIGITS: usize = 2;

// ---------------------------------------------------------------------------
// Data-Source Layout
// ---------------------------------------------------------------------------

/// Table of deployed multisig vaults. Only its row count matters here.
pub const VAULTS_TABLE: &str = "vaults";

/// Table of inbound deposits. One row per deposit, `amount` in wei.
pub const DEPOSITS_TABLE: &str = "deposits";

/// Table of outbound multisig transactions. `value` in wei, filtered on
/// the status column — only finally-executed transactions count as
/// money having left a vault.
pub const TRANSACTIONS_TABLE: &str = "transactions";

/// Schema queried when none is configured. PostgREST resolves requests
/// without a profile header against this schema anyway; being explicit
/// keeps the request headers deterministic.
pub const DEFAULT_SCHEMA: &str = "public";

// ---------------------------------------------------------------------------
// Environment Keys
// ---------------------------------------------------------------------------

/// Data-source endpoint, e.g. `https://abc123.supabase.co`.
pub const ENV_SUPABASE_URL: &str = "QUAIVAULT_SUPABASE_URL";

/// The anon (publishable) API key. Read-only under row-level security;
/// this service never holds a service-role key.
pub const ENV_SUPABASE_ANON_KEY: &str = "QUAIVAULT_SUPABASE_ANON_KEY";

/// Schema override. Falls back to [`DEFAULT_SCHEMA`] when unset.
pub const ENV_SUPABASE_SCHEMA: &str = "QUAIVAULT_SUPABASE_SCHEMA";

// ---------------------------------------------------------------------------
// StatsConfig
// ---------------------------------------------------------------------------

/// Connection settings for the external data source.
///
/// Both `supabase_url` and `supabase_anon_key` are optional: a missing
/// endpoint or credential is a designed degraded mode, not an error.
/// The aggregator answers with placeholder stats and never touches the
/// network in that state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsConfig {
    /// Base URL of the Supabase project.
    pub supabase_url: Option<String>,
    /// Anon API key sent with every request.
    pub supabase_anon_key: Option<String>,
    /// Schema the stats tables live in.
    pub schema: String,
}

impl StatsConfig {
    /// Builds a config from the process environment.
    ///
    /// Unset *and* empty variables both count as absent — an empty
    /// string in a deployment manifest should behave exactly like a
    /// missing one.
    pub fn from_env() -> Self {
        Self {
            supabase_url: non_empty(env::var(ENV_SUPABASE_URL).ok()),
            supabase_anon_key: non_empty(env::var(ENV_SUPABASE_ANON_KEY).ok()),
            schema: non_empty(env::var(ENV_SUPABASE_SCHEMA).ok())
                .unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
        }
    }

    /// Builds a fully specified config. Mostly useful in tests and in
    /// the server binary, where clap has already done the env dance.
    pub fn new(
        supabase_url: Option<String>,
        supabase_anon_key: Option<String>,
        schema: impl Into<String>,
    ) -> Self {
        Self {
            supabase_url: non_empty(supabase_url),
            supabase_anon_key: non_empty(supabase_anon_key),
            schema: schema.into(),
        }
    }

    /// An explicitly unconfigured config: no endpoint, no credential,
    /// default schema. The aggregator built from this serves placeholders.
    pub fn unconfigured() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    /// `true` iff live queries are possible: both the endpoint and the
    /// credential are present.
    pub fn is_configured(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_anon_key.is_some()
    }

    /// Returns `(url, anon_key)` when the source is fully configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self::unconfigured()
    }
}

/// Collapses `Some("")` into `None`.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_by_default() {
        let cfg = StatsConfig::default();
        assert!(!cfg.is_configured());
        assert!(cfg.credentials().is_none());
        assert_eq!(cfg.schema, DEFAULT_SCHEMA);
    }

    #[test]
    fn configured_when_url_and_key_present() {
        let cfg = StatsConfig::new(
            Some("https://proj.supabase.co".into()),
            Some("anon-key".into()),
            "quai_vault",
        );
        assert!(cfg.is_configured());
        assert_eq!(
            cfg.credentials(),
            Some(("https://proj.supabase.co", "anon-key"))
        );
        assert_eq!(cfg.schema, "quai_vault");
    }

    #[test]
    fn url_alone_is_not_configured() {
        // A URL without a key can't authenticate; treat it as absent.
        let cfg = StatsConfig::new(Some("https://proj.supabase.co".into()), None, DEFAULT_SCHEMA);
        assert!(!cfg.is_configured());
        assert!(cfg.credentials().is_none());
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let cfg = StatsConfig::new(Some(String::new()), Some(String::new()), DEFAULT_SCHEMA);
        assert!(!cfg.is_configured());
    }

    #[test]
    fn display_precision_fits_in_decimals() {
        // Two display digits carved out of an 18-digit remainder.
        assert!(DISPLAY_FRACTION_DIGITS <= QUAI_DECIMALS as usize);
    }

    #[test]
    fn table_names_are_distinct() {
        assert_ne!(VAULTS_TABLE, DEPOSITS_TABLE);
        assert_ne!(DEPOSITS_TABLE, TRANSACTIONS_TABLE);
        assert_ne!(VAULTS_TABLE, TRANSACTIONS_TABLE);
    }
}
