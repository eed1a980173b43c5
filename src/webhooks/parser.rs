//! Payload parsing and structural validation.
//!
//! Runs strictly after signature verification: only authenticated bytes are
//! ever fed to the JSON parser. A malformed body on an authenticated request
//! is a client error, never a crash.

use serde_json::Value;
use thiserror::Error;

use crate::types::WebhookEnvelope;

/// Errors produced while turning raw bytes into a [`WebhookEnvelope`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not valid JSON.
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body is valid JSON but not a well-formed envelope.
    #[error("invalid payload structure: missing or malformed field {0:?}")]
    InvalidStructure(&'static str),
}

/// Parses a raw body into a validated envelope.
///
/// The envelope must be a JSON object with a string `event`, a string
/// `timestamp`, and an object `data`. Anything else fails with
/// [`ParseError::InvalidStructure`]; non-JSON input fails with
/// [`ParseError::InvalidJson`].
pub fn parse_envelope(raw: &[u8]) -> Result<WebhookEnvelope, ParseError> {
    let value: Value = serde_json::from_slice(raw)?;

    let object = value
        .as_object()
        .ok_or(ParseError::InvalidStructure("<root>"))?;

    let event = object
        .get("event")
        .and_then(Value::as_str)
        .ok_or(ParseError::InvalidStructure("event"))?
        .to_string();

    let timestamp = object
        .get("timestamp")
        .and_then(Value::as_str)
        .ok_or(ParseError::InvalidStructure("timestamp"))?
        .to_string();

    let data = object
        .get("data")
        .and_then(Value::as_object)
        .cloned()
        .ok_or(ParseError::InvalidStructure("data"))?;

    Ok(WebhookEnvelope {
        event,
        timestamp,
        data,
    })
}
