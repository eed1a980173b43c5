//! HTTP server for the Clipper webhook receiver.
//!
//! This module implements the HTTP surface that:
//! - Accepts webhook deliveries, verifies signatures, and dispatches events
//! - Suppresses duplicate deliveries via the delivery ledger
//! - Provides health and info endpoints for probes and operators
//!
//! # Endpoints
//!
//! - `POST /webhook` - Accepts signed event deliveries
//! - `GET /health` - Returns process status and current ledger size
//! - `GET /` - Returns server info and dispatch statistics

use std::sync::Arc;

pub mod health;
pub mod root;
pub mod webhook;

pub use health::health_handler;
pub use root::root_handler;
pub use webhook::webhook_handler;

use crate::ledger::DeliveryLedger;
use crate::webhooks::EventDispatcher;

/// Shared application state.
///
/// Passed to all handlers via Axum's `State` extractor. The ledger and
/// dispatcher are owned here, not module-level globals, so tests can build
/// isolated instances and deployments can swap the ledger seam for a durable
/// store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Shared secret for HMAC-SHA256 signature verification.
    secret: Vec<u8>,

    /// Record of delivery IDs already processed.
    ledger: DeliveryLedger,

    /// Event-type routing table.
    dispatcher: EventDispatcher,
}

impl AppState {
    /// Creates application state from its owned components.
    pub fn new(
        secret: impl Into<Vec<u8>>,
        ledger: DeliveryLedger,
        dispatcher: EventDispatcher,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                secret: secret.into(),
                ledger,
                dispatcher,
            }),
        }
    }

    /// Returns the webhook secret.
    pub fn secret(&self) -> &[u8] {
        &self.inner.secret
    }

    /// Returns the delivery ledger.
    pub fn ledger(&self) -> &DeliveryLedger {
        &self.inner.ledger
    }

    /// Returns the event dispatcher.
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.inner.dispatcher
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        .with_state(app_state)
}
