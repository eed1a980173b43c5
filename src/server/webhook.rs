//! Webhook endpoint handler.
//!
//! Accepts signed Clipper event deliveries. Per request the pipeline is:
//! header validation, signature verification on the raw bytes, envelope
//! parsing, duplicate check-and-record, then dispatch. The sender retries
//! until it sees a 2xx, so the handler acknowledges as soon as the delivery
//! is recorded; business-handler failures never change the response.

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use super::AppState;
use crate::types::DeliveryId;
use crate::webhooks::parser::{ParseError, parse_envelope};
use crate::webhooks::signature::{SignatureError, verify_signature};

/// Header carrying the hex HMAC-SHA256 signature of the body.
const HEADER_SIGNATURE: &str = "x-webhook-signature";
/// Header carrying the event type tag.
const HEADER_EVENT: &str = "x-webhook-event";
/// Header carrying the sender-assigned delivery ID.
const HEADER_DELIVERY: &str = "x-webhook-delivery-id";
/// Optional header flagging a manual redelivery. Informational only.
const HEADER_REPLAY: &str = "x-webhook-replay";

/// Canonical names of the required headers, for error responses.
const REQUIRED_HEADERS: [&str; 3] = [
    "X-Webhook-Signature",
    "X-Webhook-Event",
    "X-Webhook-Delivery-ID",
];

/// Errors that can occur when processing a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// One or more required headers are absent or empty.
    #[error("missing required headers")]
    MissingHeaders,

    /// The signature does not match the body under the shared secret.
    #[error("invalid signature")]
    InvalidSignature,

    /// The body failed JSON or structural validation.
    #[error(transparent)]
    Payload(#[from] ParseError),

    /// The verifier itself failed; a server fault, not a client one.
    #[error("signature verification error: {0}")]
    Verification(#[from] SignatureError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            WebhookError::MissingHeaders => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Missing required headers",
                    "required": REQUIRED_HEADERS,
                }),
            ),
            WebhookError::InvalidSignature => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "Invalid signature"}),
            ),
            WebhookError::Payload(ParseError::InvalidJson(_)) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid JSON payload"}),
            ),
            WebhookError::Payload(ParseError::InvalidStructure(_)) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid payload structure"}),
            ),
            WebhookError::Verification(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Signature verification error"}),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Required headers:
///   - `X-Webhook-Signature`: hex HMAC-SHA256 of the raw body
///   - `X-Webhook-Event`: event type tag (e.g. "clip.approved")
///   - `X-Webhook-Delivery-ID`: unique per delivery attempt, reused on retry
/// - Optional header `X-Webhook-Replay: true` marks a manual redelivery
/// - Body: JSON `{event, timestamp, data}`
///
/// # Response
///
/// - 200 `{"status":"success",...}`: delivery processed (handler outcome
///   does not affect this)
/// - 200 `{"status":"already_processed"}`: duplicate delivery ID
/// - 400: missing headers, invalid JSON, or invalid structure
/// - 401: signature mismatch
/// - 500: internal verification failure
pub async fn webhook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, WebhookError> {
    let started = Instant::now();

    // Reject before any cryptographic work if the envelope metadata is
    // incomplete. Empty values count as missing.
    let (Some(signature), Some(event_type), Some(delivery_id)) = (
        get_header(&headers, HEADER_SIGNATURE),
        get_header(&headers, HEADER_EVENT),
        get_header(&headers, HEADER_DELIVERY),
    ) else {
        warn!("webhook delivery rejected: missing required headers");
        return Err(WebhookError::MissingHeaders);
    };

    let delivery_id = DeliveryId::new(delivery_id);
    let is_replay = get_header(&headers, HEADER_REPLAY).as_deref() == Some("true");

    debug!(
        delivery_id = %delivery_id,
        event_type = %event_type,
        is_replay,
        "received webhook delivery"
    );

    // Verify on the raw received bytes, before parsing. A mis-signed body
    // must never reach the parser.
    if !verify_signature(&body, &signature, app_state.secret())? {
        warn!(delivery_id = %delivery_id, "invalid webhook signature");
        return Err(WebhookError::InvalidSignature);
    }

    // Parse and structurally validate the authenticated body. Failures here
    // are client errors and are never recorded in the ledger.
    let envelope = parse_envelope(&body)?;

    // Atomic duplicate check. Recording before dispatch is what makes the
    // side effects at-most-once; a crash between record and dispatch loses
    // the event rather than double-processing it.
    if !app_state.ledger().check_and_record(&delivery_id) {
        debug!(delivery_id = %delivery_id, "duplicate delivery, skipping dispatch");
        return Ok(Json(json!({"status": "already_processed"})));
    }

    // Outcome is logged and counted by the dispatcher; it does not affect
    // the response.
    app_state
        .dispatcher()
        .dispatch(&event_type, &envelope, &delivery_id)
        .await;

    let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(json!({
        "status": "success",
        "received_at": Utc::now().to_rfc3339(),
        "processing_time_ms": processing_time_ms,
    })))
}

/// Extracts a header value as a non-empty string.
fn get_header(headers: &HeaderMap, name: &'static str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_header_present() {
        let mut headers = HeaderMap::new();
        headers.insert("x-webhook-event", "clip.approved".parse().unwrap());

        assert_eq!(
            get_header(&headers, "x-webhook-event").as_deref(),
            Some("clip.approved")
        );
    }

    #[test]
    fn get_header_missing() {
        let headers = HeaderMap::new();
        assert_eq!(get_header(&headers, "x-webhook-event"), None);
    }

    #[test]
    fn get_header_empty_value_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert("x-webhook-signature", "".parse().unwrap());

        assert_eq!(get_header(&headers, "x-webhook-signature"), None);
    }

    #[test]
    fn error_statuses_match_taxonomy() {
        assert_eq!(
            WebhookError::MissingHeaders.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::InvalidSignature.into_response().status(),
            StatusCode::UNAUTHORIZED
        );

        let json_err = serde_json::from_slice::<serde_json::Value>(b"{").unwrap_err();
        assert_eq!(
            WebhookError::Payload(ParseError::InvalidJson(json_err))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::Payload(ParseError::InvalidStructure("data"))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
