//! Webhook receiver for Clipper platform event deliveries.
//!
//! Clipper delivers moderation lifecycle events (`clip.submitted`,
//! `clip.approved`, `clip.rejected`) over HTTP with **at-least-once**
//! semantics: a delivery may be retried with the same delivery ID until the
//! receiver acknowledges it. This crate accepts those deliveries,
//! authenticates them, and guarantees **at-most-once** observable side
//! effects per delivery ID within the process lifetime.
//!
//! ## Guarantees
//! - Signature verification (HMAC-SHA256, constant-time comparison) on the
//!   raw request body, before any parsing
//! - Duplicate deliveries are acknowledged without re-invoking handlers
//! - Bounded memory: the delivery ledger evicts oldest-first at capacity
//! - Handler failures never fail the HTTP acknowledgment
//!
//! ## Non-Guarantees
//! - Durability across restarts (the ledger is in-memory only; a redelivery
//!   shortly after a restart is reprocessed)
//! - Cross-instance deduplication
//! - Event ordering across deliveries

pub mod config;
pub mod ledger;
pub mod server;
pub mod types;
pub mod webhooks;
