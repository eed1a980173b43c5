//! Core domain types for webhook deliveries.

mod envelope;
mod ids;

pub use envelope::WebhookEnvelope;
pub use ids::DeliveryId;
