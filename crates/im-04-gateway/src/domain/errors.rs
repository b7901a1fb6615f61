//! # Gateway Errors

use im_01_certificate_authority::CertificateError;
use im_02_secure_messenger::MessengerError;
use shared_bus::TransportError;
use shared_types::ErrorKind;
use thiserror::Error;

/// Errors from opening gateways and moving messages through them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No handler is registered under the requested name.
    #[error("Unsupported protocol: {protocol}")]
    UnsupportedProtocol {
        /// Requested protocol name.
        protocol: String,
    },

    /// The operation needs the gateway's own identity and none was given.
    #[error("Gateway has no self claim")]
    MissingSelfClaim,

    /// The message failed the handler, could not be decoded, or names
    /// another protocol.
    #[error("Malformed {protocol} gateway message: {reason}")]
    Malformed {
        /// Protocol of the gateway that rejected it.
        protocol: String,
        /// What was wrong.
        reason: String,
    },

    /// The wire format version is not understood.
    #[error("Unsupported gateway message version {version}")]
    UnsupportedVersion {
        /// Version found on the wire.
        version: u16,
    },

    /// An authenticated gateway received a message without a certificate.
    #[error("Unauthenticated {protocol} gateway message")]
    Unauthenticated {
        /// Protocol of the receiving gateway.
        protocol: String,
    },

    /// Inbound certificate verification or replay check failed.
    #[error(transparent)]
    Authentication(#[from] MessengerError),

    /// Outbound certificate could not be made.
    #[error(transparent)]
    Certificate(#[from] CertificateError),

    /// The transport failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl GatewayError {
    /// Shared error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::UnsupportedProtocol { .. } => ErrorKind::UnsupportedProtocol,
            GatewayError::MissingSelfClaim => ErrorKind::Configuration,
            GatewayError::Malformed { .. } => ErrorKind::MalformedProtocolMessage,
            GatewayError::UnsupportedVersion { .. } | GatewayError::Transport(_) => {
                ErrorKind::Transport
            }
            GatewayError::Unauthenticated { .. } => ErrorKind::CertificateInvalid,
            GatewayError::Authentication(e) => e.kind(),
            GatewayError::Certificate(e) => e.kind(),
        }
    }
}

/// Errors from building a handler registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A handler has a blank name.
    #[error("Handler name must not be empty")]
    EmptyName,

    /// Two handlers share a name.
    #[error("Handler {0} registered twice")]
    DuplicateName(String),
}

impl RegistryError {
    /// Shared error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}
