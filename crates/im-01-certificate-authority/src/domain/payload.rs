//! # Canonical Certificate Payload
//!
//! The exact bytes a certificate proof signs.

use crate::domain::context::CertificateContext;
use crate::domain::errors::CertificateError;
use shared_types::Identity;
use uuid::Uuid;

/// Domain tag prefixed to every certificate payload.
pub const CERTIFICATE_DOMAIN_TAG: &str = "im-certificate/v1";

/// Encode `(tag, context, claim, correlation_id)` with bincode.
///
/// Deterministic for equal inputs; any change to the context, the claim or
/// the correlation id changes the bytes.
pub fn canonical_payload(
    context: &CertificateContext,
    claim: &Identity,
    correlation_id: Uuid,
) -> Result<Vec<u8>, CertificateError> {
    bincode::serialize(&(CERTIFICATE_DOMAIN_TAG, context, claim, correlation_id.as_bytes()))
        .map_err(|e| CertificateError::Encoding(e.to_string()))
}
