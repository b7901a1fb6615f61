//! # Protocol Errors

use crate::domain::schema::SchemaViolation;
use im_02_secure_messenger::MessengerError;
use shared_types::ErrorKind;
use thiserror::Error;

/// Why a protocol message was malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The message type is not part of the protocol.
    #[error("unknown message type '{0}'")]
    UnknownType(String),

    /// The content does not satisfy the type's validator.
    #[error("invalid '{message_type}' content: {violation}")]
    InvalidContent {
        /// Declared message type.
        message_type: String,
        /// What the validator rejected.
        violation: SchemaViolation,
    },

    /// The payload is not a protocol message at all.
    #[error("undecodable payload: {0}")]
    Undecodable(String),
}

/// Errors from the protocol validation layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Message failed shape validation. On send, no transport I/O happened.
    #[error("Malformed {protocol} message: {reason}")]
    Malformed {
        /// Protocol the message was checked against.
        protocol: String,
        /// What was wrong with it.
        reason: MalformedReason,
    },

    /// The underlying messenger failed.
    #[error(transparent)]
    Messenger(#[from] MessengerError),
}

impl ProtocolError {
    /// Shared error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::Malformed { .. } => ErrorKind::MalformedProtocolMessage,
            ProtocolError::Messenger(e) => e.kind(),
        }
    }
}

/// Errors from building a protocol definition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The protocol name is empty.
    #[error("Protocol name must not be empty")]
    EmptyName,

    /// A message type name is empty.
    #[error("Protocol {protocol} declares an empty message type")]
    EmptyMessageType {
        /// Protocol being built.
        protocol: String,
    },

    /// The same message type was declared twice.
    #[error("Protocol {protocol} declares message type '{message_type}' twice")]
    DuplicateMessageType {
        /// Protocol being built.
        protocol: String,
        /// Repeated message type.
        message_type: String,
    },

    /// No message types were declared.
    #[error("Protocol {protocol} declares no message types")]
    NoMessageTypes {
        /// Protocol being built.
        protocol: String,
    },
}

impl DefinitionError {
    /// Shared error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}
