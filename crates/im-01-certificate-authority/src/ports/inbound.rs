//! # Inbound Ports (Driving Ports / API)
//!
//! The certificate API used by messengers and gateways. It is injected as a
//! trait object so callers can substitute their own issuer.

use crate::domain::context::CertificateContext;
use crate::domain::errors::CertificateError;
use crate::ports::outbound::{DirectoryLookup, Signer};
use async_trait::async_trait;
use shared_types::{Certificate, Identity};
use uuid::Uuid;

/// Certificate issuance and verification.
#[async_trait]
pub trait CertificateIssuer: Send + Sync {
    /// Build a certificate for `identity` bound to `correlation_id` and to
    /// the channel described by `context`.
    ///
    /// Invokes `signer` once over the canonical payload and has no other
    /// side effects.
    ///
    /// # Errors
    /// * `CertificateError::Signing` - The signer failed
    /// * `CertificateError::Encoding` - The payload could not be encoded
    async fn make(
        &self,
        identity: &Identity,
        signer: &dyn Signer,
        correlation_id: Uuid,
        context: &CertificateContext,
    ) -> Result<Certificate, CertificateError>;

    /// Check that `certificate` was signed by the key the directory currently
    /// holds for its claim, over `expected_correlation_id` in the receiver's
    /// own `context`.
    ///
    /// Side-effect free and idempotent.
    ///
    /// # Errors
    /// * `CertificateError::UnknownIdentity` - No directory record for the claim
    /// * `CertificateError::CertificateInvalid` - Wrong key, tampered proof,
    ///   substituted correlation id or a certificate made for another context
    /// * `CertificateError::Directory` - The lookup itself failed
    async fn verify(
        &self,
        certificate: &Certificate,
        expected_correlation_id: Uuid,
        context: &CertificateContext,
        directory: &dyn DirectoryLookup,
    ) -> Result<(), CertificateError>;
}
