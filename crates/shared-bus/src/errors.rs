//! # Transport Errors
//!
//! Transport failures are passed through unchanged by every layer above,
//! never reinterpreted as security failures.

use shared_types::ErrorKind;
use thiserror::Error;

/// Errors from publish/subscribe operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The bus or channel was closed.
    #[error("Transport closed")]
    Closed,

    /// The topic name is not addressable.
    #[error("Invalid topic {0:?}")]
    InvalidTopic(String),

    /// Outbound message could not be encoded for the wire.
    #[error("Failed to encode message for {topic}: {reason}")]
    Encode { topic: String, reason: String },

    /// Inbound bytes could not be decoded into the channel's message type.
    #[error("Failed to decode message on {topic}: {reason}")]
    Decode { topic: String, reason: String },

    /// The medium refused the publish.
    #[error("Publish to {topic} failed: {reason}")]
    PublishFailed { topic: String, reason: String },
}

impl TransportError {
    /// Error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Transport
    }
}
