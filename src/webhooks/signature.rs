//! Webhook signature verification using HMAC-SHA256.
//!
//! Clipper signs each delivery by computing HMAC-SHA256 over the raw request
//! body with the shared secret and sending the hex digest in the
//! `X-Webhook-Signature` header (no algorithm prefix).
//!
//! Verification is the first step in webhook processing; invalid signatures
//! must be rejected before the body is parsed.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Internal failure while constructing the verifier.
///
/// Distinct from an authentication failure: a request that hits this is
/// rejected as a server error, not as unauthorized.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The MAC could not be keyed with the configured secret.
    #[error("failed to initialize HMAC: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),
}

/// Computes the hex-encoded HMAC-SHA256 signature of a payload.
///
/// This is the sender side of the scheme; the receiver only needs it to
/// generate expected signatures in tests.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a delivery signature against the raw payload and shared secret.
///
/// Returns `Ok(true)` when the signature matches, `Ok(false)` when it does
/// not (including malformed hex in the provided signature, which an attacker
/// controls). The comparison is constant-time via the HMAC library; string
/// equality must never be used here.
///
/// # Errors
///
/// Returns [`SignatureError`] only for internal verifier failures, which the
/// caller surfaces as a server error rather than an authentication failure.
///
/// # Examples
///
/// ```
/// use clipper_webhook::webhooks::{compute_signature, verify_signature};
///
/// let payload = b"{\"event\":\"clip.approved\"}";
/// let secret = b"shared-secret";
///
/// let signature = compute_signature(payload, secret);
/// assert!(verify_signature(payload, &signature, secret).unwrap());
/// assert!(!verify_signature(payload, &signature, b"wrong-secret").unwrap());
/// ```
pub fn verify_signature(
    payload: &[u8],
    signature_hex: &str,
    secret: &[u8],
) -> Result<bool, SignatureError> {
    // Malformed hex cannot match any digest we would compute.
    let Ok(provided) = hex::decode(signature_hex) else {
        return Ok(false);
    };

    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(payload);

    // Constant-time comparison via the HMAC library.
    Ok(mac.verify_slice(&provided).is_ok())
}
