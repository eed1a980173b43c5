//! Event dispatch layer for routing validated deliveries to handlers.
//!
//! The dispatcher maps an event-type tag (the `X-Webhook-Event` header
//! value) to a registered [`EventHandler`] and invokes it with a bounded run
//! time. Acknowledgment of receipt is decoupled from business-level
//! recognition: unknown event types and handler failures are logged and
//! counted, and the request still completes as success.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::types::{DeliveryId, WebhookEnvelope};
use crate::webhooks::handlers::{
    ClipApprovedHandler, ClipRejectedHandler, ClipSubmittedHandler, EventHandler,
};

/// Default bound on a single handler invocation.
///
/// A slow handler must not hold a request task indefinitely; the delivery is
/// already recorded, so cutting the handler off does not change the
/// idempotency story.
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(10);

/// Captured result of dispatching one delivery.
///
/// Every variant maps to a 200 acknowledgment at the HTTP layer; the
/// distinction exists for logging and statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler was found and completed successfully.
    Handled,

    /// No handler is registered for the event type.
    Unhandled,

    /// The handler returned an error (message retained for logging).
    Failed(String),

    /// The handler exceeded the dispatch timeout.
    TimedOut,
}

/// Monotonic counters over dispatch outcomes.
///
/// Handler failures would otherwise be invisible to the sender (the request
/// still succeeds), so they are surfaced here and through the log stream.
#[derive(Debug, Default)]
struct DispatchStats {
    handled: AtomicU64,
    unhandled: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
}

/// Point-in-time copy of the dispatch counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchStatsSnapshot {
    pub handled: u64,
    pub unhandled: u64,
    pub failed: u64,
    pub timed_out: u64,
}

/// Routes validated envelopes to type-specific handlers.
pub struct EventDispatcher {
    handlers: HashMap<String, Box<dyn EventHandler>>,
    handler_timeout: Duration,
    stats: DispatchStats,
}

impl EventDispatcher {
    /// Creates a dispatcher with no registered handlers.
    pub fn new() -> Self {
        EventDispatcher {
            handlers: HashMap::new(),
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
            stats: DispatchStats::default(),
        }
    }

    /// Creates a dispatcher with the built-in clip moderation handlers.
    pub fn with_clipper_handlers() -> Self {
        Self::new()
            .with_handler("clip.submitted", Box::new(ClipSubmittedHandler))
            .with_handler("clip.approved", Box::new(ClipApprovedHandler))
            .with_handler("clip.rejected", Box::new(ClipRejectedHandler))
    }

    /// Registers (or replaces) the handler for an event type.
    pub fn with_handler(
        mut self,
        event_type: impl Into<String>,
        handler: Box<dyn EventHandler>,
    ) -> Self {
        self.handlers.insert(event_type.into(), handler);
        self
    }

    /// Overrides the per-invocation handler timeout.
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Dispatches one validated delivery to its handler.
    ///
    /// `event_type` is the tag from the request metadata. The outcome is
    /// logged and counted here; callers only need it when they want to
    /// inspect the result (tests, stats endpoints).
    pub async fn dispatch(
        &self,
        event_type: &str,
        envelope: &WebhookEnvelope,
        delivery_id: &DeliveryId,
    ) -> DispatchOutcome {
        let Some(handler) = self.handlers.get(event_type) else {
            warn!(
                event_type,
                delivery_id = %delivery_id,
                "no handler registered for event type"
            );
            self.stats.unhandled.fetch_add(1, Ordering::Relaxed);
            return DispatchOutcome::Unhandled;
        };

        match tokio::time::timeout(self.handler_timeout, handler.handle(envelope, delivery_id))
            .await
        {
            Ok(Ok(())) => {
                debug!(event_type, delivery_id = %delivery_id, "event handled");
                self.stats.handled.fetch_add(1, Ordering::Relaxed);
                DispatchOutcome::Handled
            }
            Ok(Err(e)) => {
                error!(
                    event_type,
                    delivery_id = %delivery_id,
                    error = %e,
                    "event handler failed"
                );
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                DispatchOutcome::Failed(e.to_string())
            }
            Err(_) => {
                error!(
                    event_type,
                    delivery_id = %delivery_id,
                    timeout_ms = self.handler_timeout.as_millis() as u64,
                    "event handler timed out"
                );
                self.stats.timed_out.fetch_add(1, Ordering::Relaxed);
                DispatchOutcome::TimedOut
            }
        }
    }

    /// Returns a snapshot of the outcome counters.
    pub fn stats(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            handled: self.stats.handled.load(Ordering::Relaxed),
            unhandled: self.stats.unhandled.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
            timed_out: self.stats.timed_out.load(Ordering::Relaxed),
        }
    }

    /// Returns the registered event types, for the info endpoint.
    pub fn event_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
