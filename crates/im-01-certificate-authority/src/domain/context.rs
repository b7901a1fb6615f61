//! # Certificate Context
//!
//! Where a certificate is meant to be presented. The context is part of the
//! signed payload, so a certificate made for one channel fails verification
//! on every other channel, recipient or protocol.

use serde::Serialize;
use shared_types::Identity;
use std::fmt;

/// The delivery channel a certificate is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CertificateContext {
    /// A secure messenger envelope on `recipient`'s inbound channel.
    Inbound {
        /// Identity whose channel carries the envelope.
        recipient: Identity,
    },

    /// A gateway message on `recipient`'s topic for `protocol`.
    Gateway {
        /// Protocol name of the gateway.
        protocol: String,
        /// Identity whose gateway receives the message.
        recipient: Identity,
    },
}

impl CertificateContext {
    /// Context for an envelope sent to `recipient`'s inbound channel.
    #[must_use]
    pub fn inbound(recipient: &Identity) -> Self {
        CertificateContext::Inbound {
            recipient: recipient.clone(),
        }
    }

    /// Context for a `protocol` gateway message sent to `recipient`.
    #[must_use]
    pub fn gateway(protocol: &str, recipient: &Identity) -> Self {
        CertificateContext::Gateway {
            protocol: protocol.to_string(),
            recipient: recipient.clone(),
        }
    }

    /// The identity the certificate is addressed to.
    #[must_use]
    pub fn recipient(&self) -> &Identity {
        match self {
            CertificateContext::Inbound { recipient } | CertificateContext::Gateway { recipient, .. } => {
                recipient
            }
        }
    }
}

impl fmt::Display for CertificateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateContext::Inbound { recipient } => write!(f, "inbound/{recipient}"),
            CertificateContext::Gateway {
                protocol,
                recipient,
            } => write!(f, "gateway/{protocol}/{recipient}"),
        }
    }
}
