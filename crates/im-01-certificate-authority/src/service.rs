//! # Certificate Authority Service
//!
//! Application service implementing the `CertificateIssuer` port.
//!
//! ## Verification Steps
//!
//! 1. Resolve `certificate.claim` in the directory
//! 2. Recompute the canonical payload with the *expected* correlation id and
//!    the receiver's own context
//! 3. Check the proof against the resolved key (strict Ed25519)

use crate::domain::context::CertificateContext;
use crate::domain::errors::CertificateError;
use crate::domain::payload::canonical_payload;
use crate::ports::inbound::CertificateIssuer;
use crate::ports::outbound::{DirectoryLookup, Signer};
use async_trait::async_trait;
use shared_crypto::Ed25519Signature;
use shared_types::{Certificate, Identity};
use tracing::debug;
use uuid::Uuid;

/// Stateless certificate authority.
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateAuthority;

impl CertificateAuthority {
    /// Create the authority.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CertificateIssuer for CertificateAuthority {
    async fn make(
        &self,
        identity: &Identity,
        signer: &dyn Signer,
        correlation_id: Uuid,
        context: &CertificateContext,
    ) -> Result<Certificate, CertificateError> {
        let payload = canonical_payload(context, identity, correlation_id)?;
        let signature = signer.sign(&payload).await?;

        debug!(
            identity = %identity,
            correlation_id = %correlation_id,
            context = %context,
            "Certificate issued"
        );

        Ok(Certificate {
            claim: identity.clone(),
            proof: signature.to_bytes(),
        })
    }

    async fn verify(
        &self,
        certificate: &Certificate,
        expected_correlation_id: Uuid,
        context: &CertificateContext,
        directory: &dyn DirectoryLookup,
    ) -> Result<(), CertificateError> {
        let claim = &certificate.claim;

        let key = directory
            .resolve(claim)
            .await?
            .ok_or_else(|| CertificateError::UnknownIdentity {
                identity: claim.clone(),
            })?;

        let invalid = || CertificateError::CertificateInvalid {
            claim: claim.clone(),
        };

        let payload =
            canonical_payload(context, claim, expected_correlation_id).map_err(|_| invalid())?;
        key.verify(&payload, &Ed25519Signature::from_bytes(certificate.proof))
            .map_err(|_| invalid())?;

        debug!(
            identity = %claim,
            correlation_id = %expected_correlation_id,
            context = %context,
            "Certificate verified"
        );
        Ok(())
    }
}
