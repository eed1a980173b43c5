//! Newtype wrappers for domain identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A sender-assigned webhook delivery ID.
///
/// The sender generates one ID per delivery attempt and reuses it verbatim
/// when redelivering the same logical event, which is what makes it usable
/// as a deduplication key. The value is opaque to the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(pub String);

impl DeliveryId {
    pub fn new(s: impl Into<String>) -> Self {
        DeliveryId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DeliveryId {
    fn from(s: String) -> Self {
        DeliveryId(s)
    }
}

impl From<&str> for DeliveryId {
    fn from(s: &str) -> Self {
        DeliveryId(s.to_string())
    }
}
