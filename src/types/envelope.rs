//! The webhook payload envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structurally validated webhook payload.
///
/// Every Clipper delivery carries a JSON body of this shape. The envelope is
/// only constructed *after* signature verification succeeds; verification
/// always runs on the raw received bytes, never on a re-serialized form of
/// this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    /// Event type as stated in the payload (e.g. `clip.approved`).
    pub event: String,

    /// Sender-side emission timestamp, passed through opaquely.
    pub timestamp: String,

    /// Event-specific fields. Contents depend on the event type and are
    /// interpreted by the matching handler.
    pub data: Map<String, Value>,
}
