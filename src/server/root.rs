//! Root endpoint with server information.
//!
//! Gives operators a one-stop view of the exposed endpoints, the registered
//! event types, and dispatch statistics. Handler failures do not surface in
//! HTTP responses, so the stats block here (plus the log stream) is where
//! they become visible.

use axum::Json;
use axum::extract::State;
use serde_json::json;

use super::AppState;

/// Root info handler.
pub async fn root_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "Clipper Webhook Receiver",
        "endpoints": {
            "webhook": "POST /webhook",
            "health": "GET /health",
        },
        "event_types": app_state.dispatcher().event_types(),
        "stats": {
            "processed_deliveries": app_state.ledger().len(),
            "dispatch": app_state.dispatcher().stats(),
        },
    }))
}
