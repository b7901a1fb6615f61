//! # Gateway Wire Format
//!
//! What a gateway publishes on a topic, JSON encoded.
//!
//! ```text
//! gateway/<protocol>/<recipient identity>
//! ```

use serde::{Deserialize, Serialize};
use shared_types::{Certificate, Identity, ProtocolMessage};
use uuid::Uuid;

/// Prefix of every gateway topic.
pub const GATEWAY_TOPIC_PREFIX: &str = "gateway/";

/// Topic on which `identity`'s gateway for `protocol` listens.
#[must_use]
pub fn gateway_topic(protocol: &str, identity: &Identity) -> String {
    format!("{GATEWAY_TOPIC_PREFIX}{protocol}/{identity}")
}

/// A protocol message in transit between gateways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Wire format version.
    pub version: u16,

    /// Protocol the sender validated against.
    pub protocol: String,

    /// Per-message id, bound into `certificate` when present.
    pub correlation_id: Uuid,

    /// Sender certificate; present when the sender runs authenticated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<Certificate>,

    /// The typed payload.
    pub message: ProtocolMessage,
}

impl GatewayMessage {
    /// Current wire format version.
    pub const CURRENT_VERSION: u16 = 1;

    /// Assemble a message at the current version.
    #[must_use]
    pub fn new(
        protocol: &str,
        correlation_id: Uuid,
        certificate: Option<Certificate>,
        message: ProtocolMessage,
    ) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            protocol: protocol.to_string(),
            correlation_id,
            certificate,
            message,
        }
    }
}
