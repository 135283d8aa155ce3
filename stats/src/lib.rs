// Copyright (c) 2026 Quai Vault Contributors. MIT License.
// See LICENSE for details.

//! # Quai Vault Stats — Core Pipeline
//!
//! The numbers on quaivault.org's front page come from somewhere, and
//! this crate is that somewhere: a small aggregation pipeline that asks
//! the hosted ledger how many multisig vaults exist and how much QUAI
//! they hold net of executed withdrawals, then formats the answer for
//! humans.
//!
//! It is deliberately boring. One read pass, big-integer arithmetic
//! (never floats — this is money), and a failure policy that prefers
//! quiet zeroes over error pages. The interesting decisions are all
//! about *degradation*: which query failures take the whole snapshot
//! down, which ones only zero the monetary figure, and which ones are
//! silently absorbed.
//!
//! ## Architecture
//!
//! - **config** — connection settings and pipeline constants.
//! - **error** — the failure taxonomy of the data-source boundary.
//! - **format** — wei to display string, truncating, comma-grouped.
//! - **record** — the projected ledger rows and the tx status tag.
//! - **source** — the query seam: PostgREST in production, memory in tests.
//! - **aggregate** — the snapshot type and the aggregator itself.
//!
//! ## Design Philosophy
//!
//! 1. The aggregator never fails. Callers render, they don't recover.
//! 2. If it touches money, it's a `BigUint` and it has tests. Plural.
//! 3. Configuration is a value you pass around, not ambient state.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod format;
pub mod record;
pub mod source;
