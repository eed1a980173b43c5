//! Webhook authentication, validation, and dispatch.
//!
//! This module provides:
//! - Signature verification for delivery payloads (HMAC-SHA256)
//! - Envelope parsing and structural validation
//! - Routing of validated envelopes to event handlers

pub mod dispatch;
pub mod handlers;
pub mod parser;
pub mod signature;

pub use dispatch::{DispatchOutcome, DispatchStatsSnapshot, EventDispatcher};
pub use handlers::{EventHandler, HandlerError};
pub use parser::{ParseError, parse_envelope};
pub use signature::{SignatureError, compute_signature, verify_signature};
