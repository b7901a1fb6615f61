//! # Protocol Message
//!
//! The typed payload carried once security validation passes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A typed application message: `{ "type": ..., "content": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolMessage {
    /// Message type, e.g. `PAYMENT_REQUEST`.
    #[serde(rename = "type")]
    pub message_type: String,

    /// Type-specific content. Shape is checked by the protocol's validator.
    pub content: Value,
}

impl ProtocolMessage {
    /// Create a message of the given type.
    pub fn new(message_type: impl Into<String>, content: Value) -> Self {
        Self {
            message_type: message_type.into(),
            content,
        }
    }

    /// Serialize to the JSON bytes used as a transport payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from a transport payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
