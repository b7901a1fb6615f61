//! # Certificate and Envelope
//!
//! The unit placed on the transport for point-to-point messaging.
//!
//! ## Security Properties
//!
//! - **Versioning**: All envelopes include a `version` field for forward compatibility.
//! - **Correlation**: Every envelope carries a per-sender `correlation_id`.
//! - **Bound Certificates**: The certificate proof signs the claim, the correlation
//!   id and the receiving channel, so a captured certificate cannot be reused under
//!   another correlation id or on another channel.
//! - **Certificate Authority**: `certificate.claim` is the only statement of the
//!   sender's identity and is meaningless until verified against the directory.

use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;
use uuid::Uuid;

/// Signed proof binding a claimed identity to one correlation id.
///
/// Created fresh for every outbound message and discarded after verification.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// The identity the sender claims to be.
    pub claim: Identity,

    /// Ed25519 signature by the claimed identity's key over the canonical
    /// `(claim, correlation_id)` payload.
    #[serde_as(as = "Base64")]
    pub proof: [u8; 64],
}

/// The universal transport wrapper for point-to-point messages.
///
/// Binary fields travel as standard padded base64 strings.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    // =========================================================================
    // HEADER SECTION
    // =========================================================================
    /// Envelope format version.
    /// MUST be checked by receivers before verification.
    pub version: u16,

    /// Sender's certificate for this message.
    pub certificate: Certificate,

    /// Generated by the sender per message; bound into `certificate.proof`.
    pub correlation_id: Uuid,

    // =========================================================================
    // PAYLOAD SECTION
    // =========================================================================
    /// Opaque application payload.
    #[serde_as(as = "Base64")]
    pub payload: Vec<u8>,
}

impl Envelope {
    /// Current envelope version.
    pub const CURRENT_VERSION: u16 = 1;

    /// Assemble an envelope at the current version.
    #[must_use]
    pub fn new(certificate: Certificate, correlation_id: Uuid, payload: Vec<u8>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            certificate,
            correlation_id,
            payload,
        }
    }

    /// Whether this receiver understands the envelope's version.
    #[must_use]
    pub fn is_supported_version(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }
}
