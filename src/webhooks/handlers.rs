//! Event handlers for Clipper webhook events.
//!
//! A handler is the business-logic capability behind one event type. The
//! dispatcher treats handlers as opaque: it invokes them, bounds their run
//! time, and captures their outcome, but never lets a handler failure leak
//! into the HTTP response.
//!
//! The built-in handlers cover the clip moderation lifecycle and log the
//! event fields they care about; real deployments replace or extend them
//! via [`EventDispatcher::with_handler`](crate::webhooks::EventDispatcher::with_handler).

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::types::{DeliveryId, WebhookEnvelope};

/// Errors a handler can surface.
///
/// These are captured and logged by the dispatcher; they never propagate to
/// the HTTP layer, because the delivery has already been recorded and a
/// failure status would only provoke a retry the ledger would suppress.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The event payload did not contain what the handler needed.
    #[error("invalid event data: {0}")]
    InvalidData(String),

    /// The handler's downstream operation failed.
    #[error("{0}")]
    Failed(String),
}

/// Business-logic capability for one event type.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Processes a validated envelope.
    ///
    /// Called at most once per delivery ID (within the process lifetime).
    async fn handle(
        &self,
        envelope: &WebhookEnvelope,
        delivery_id: &DeliveryId,
    ) -> Result<(), HandlerError>;
}

/// Handles `clip.submitted`: a user submitted a clip for moderation.
pub struct ClipSubmittedHandler;

#[async_trait]
impl EventHandler for ClipSubmittedHandler {
    async fn handle(
        &self,
        envelope: &WebhookEnvelope,
        delivery_id: &DeliveryId,
    ) -> Result<(), HandlerError> {
        info!(
            delivery_id = %delivery_id,
            user_id = ?field(envelope, "user_id"),
            submission_id = ?field(envelope, "submission_id"),
            clip_id = ?field(envelope, "clip_id"),
            "clip submitted"
        );
        Ok(())
    }
}

/// Handles `clip.approved`: a moderator approved a clip.
pub struct ClipApprovedHandler;

#[async_trait]
impl EventHandler for ClipApprovedHandler {
    async fn handle(
        &self,
        envelope: &WebhookEnvelope,
        delivery_id: &DeliveryId,
    ) -> Result<(), HandlerError> {
        info!(
            delivery_id = %delivery_id,
            clip_id = ?field(envelope, "clip_id"),
            approved_by = ?field(envelope, "approved_by"),
            "clip approved"
        );
        Ok(())
    }
}

/// Handles `clip.rejected`: a moderator rejected a clip.
pub struct ClipRejectedHandler;

#[async_trait]
impl EventHandler for ClipRejectedHandler {
    async fn handle(
        &self,
        envelope: &WebhookEnvelope,
        delivery_id: &DeliveryId,
    ) -> Result<(), HandlerError> {
        info!(
            delivery_id = %delivery_id,
            clip_id = ?field(envelope, "clip_id"),
            reason = ?field(envelope, "reason"),
            "clip rejected"
        );
        Ok(())
    }
}

/// Looks up an event data field for logging. Absent fields log as `None`.
fn field<'a>(envelope: &'a WebhookEnvelope, key: &str) -> Option<&'a Value> {
    envelope.data.get(key)
}
