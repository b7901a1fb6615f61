//! # Messenger Errors

use im_01_certificate_authority::{CertificateError, DirectoryError};
use shared_bus::{ReplayError, TransportError};
use shared_types::{ErrorKind, Identity};
use thiserror::Error;
use uuid::Uuid;

/// Errors from sending or receiving authenticated messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessengerError {
    /// The recipient has no directory record; nothing was published.
    #[error("Unknown recipient: {identity}")]
    UnknownIdentity {
        /// The recipient that could not be resolved.
        identity: Identity,
    },

    /// Certificate issuance or verification failed.
    #[error(transparent)]
    Certificate(#[from] CertificateError),

    /// A verified `(claim, correlation_id)` pair arrived a second time.
    #[error("Replay detected: correlation id {correlation_id} from {claim} was already delivered")]
    ReplayDetected {
        /// Sender claim of the replayed envelope.
        claim: Identity,
        /// Reused correlation id.
        correlation_id: Uuid,
    },

    /// The correlation id is outside the replay window or carries no issue
    /// time; the message is never delivered, however new its pair is.
    #[error("Stale message from {claim}: {reason}")]
    Stale {
        /// Sender claim.
        claim: Identity,
        /// Offending correlation id.
        correlation_id: Uuid,
        /// Which time check failed.
        reason: String,
    },

    /// The envelope format version is not understood by this receiver.
    #[error("Unsupported envelope version {version}")]
    UnsupportedVersion {
        /// Version found on the wire.
        version: u16,
    },

    /// The transport failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The directory lookup failed.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl MessengerError {
    /// Shared error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            MessengerError::UnknownIdentity { .. } => ErrorKind::UnknownIdentity,
            MessengerError::Certificate(e) => e.kind(),
            MessengerError::ReplayDetected { .. } | MessengerError::Stale { .. } => {
                ErrorKind::CertificateInvalid
            }
            MessengerError::UnsupportedVersion { .. } | MessengerError::Transport(_) => {
                ErrorKind::Transport
            }
            MessengerError::Directory(_) => ErrorKind::Directory,
        }
    }
}

impl From<ReplayError> for MessengerError {
    fn from(error: ReplayError) -> Self {
        let reason = error.to_string();
        match error {
            ReplayError::Replayed {
                claim,
                correlation_id,
            } => MessengerError::ReplayDetected {
                claim,
                correlation_id,
            },
            ReplayError::Untimestamped {
                claim,
                correlation_id,
            }
            | ReplayError::TooOld {
                claim,
                correlation_id,
                ..
            }
            | ReplayError::FromFuture {
                claim,
                correlation_id,
                ..
            } => MessengerError::Stale {
                claim,
                correlation_id,
                reason,
            },
        }
    }
}
