//! # Certificate Errors

use crate::ports::outbound::{DirectoryError, SignerError};
use shared_types::{ErrorKind, Identity};
use thiserror::Error;

/// Errors from certificate issuance and verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertificateError {
    /// The directory has no key for the claimed identity.
    #[error("Unknown identity: {identity}")]
    UnknownIdentity {
        /// The claim that could not be resolved.
        identity: Identity,
    },

    /// The proof does not verify for the claim and correlation id.
    #[error("Certificate invalid for claim {claim}")]
    CertificateInvalid {
        /// The claim carried by the rejected certificate.
        claim: Identity,
    },

    /// The signing capability failed.
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    /// The directory lookup failed.
    #[error("Directory lookup failed: {0}")]
    Directory(#[from] DirectoryError),

    /// The canonical payload could not be encoded.
    #[error("Certificate payload encoding failed: {0}")]
    Encoding(String),
}

impl CertificateError {
    /// Shared error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CertificateError::UnknownIdentity { .. } => ErrorKind::UnknownIdentity,
            CertificateError::CertificateInvalid { .. } => ErrorKind::CertificateInvalid,
            CertificateError::Signing(_) | CertificateError::Encoding(_) => ErrorKind::Signing,
            CertificateError::Directory(_) => ErrorKind::Directory,
        }
    }
}
