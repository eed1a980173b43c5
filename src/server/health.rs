//! Health check endpoint for liveness probes.
//!
//! Returns process status and the current ledger size. No authentication:
//! load balancers and orchestration systems probe this directly.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::json;

use super::AppState;

/// Health check handler.
///
/// # Example
///
/// ```ignore
/// GET /health HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: application/json
///
/// {"status":"healthy","timestamp":"...","processed_deliveries":42}
/// ```
pub async fn health_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "processed_deliveries": app_state.ledger().len(),
    }))
}
