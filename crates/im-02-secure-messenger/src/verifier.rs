//! # Inbound Envelope Verification
//!
//! The receive-side gate every envelope passes before application code
//! sees it.
//!
//! ## Steps
//!
//! 1. **Version** - reject formats this receiver does not understand
//! 2. **Certificate** - verify `(claim, correlation_id)` against the directory,
//!    in the receiver's own context (its inbound channel, or its gateway topic)
//! 3. **Freshness** - reject correlation ids issued outside the window
//! 4. **Replay** - record the verified pair; reject repeats inside the window
//!
//! Steps 3 and 4 run only after a certificate verified, so unauthenticated
//! traffic cannot fill the cache.

use crate::domain::config::MessengerConfig;
use crate::domain::errors::MessengerError;
use im_01_certificate_authority::{CertificateContext, CertificateIssuer, DirectoryLookup};
use parking_lot::Mutex;
use shared_bus::CorrelationCache;
use shared_types::{Certificate, Envelope};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Receive-side authentication shared by messengers and gateways.
pub struct EnvelopeVerifier {
    issuer: Arc<dyn CertificateIssuer>,
    directory: Arc<dyn DirectoryLookup>,
    /// `None` when replay protection is disabled.
    replay_cache: Option<Mutex<CorrelationCache>>,
}

impl EnvelopeVerifier {
    /// Build a verifier from configuration.
    pub fn new(
        issuer: Arc<dyn CertificateIssuer>,
        directory: Arc<dyn DirectoryLookup>,
        config: &MessengerConfig,
    ) -> Self {
        let replay_cache = config.replay_protection.then(|| {
            Mutex::new(
                CorrelationCache::with_config(config.replay_window, config.replay_capacity)
                    .with_max_future_skew(config.max_clock_skew),
            )
        });

        Self {
            issuer,
            directory,
            replay_cache,
        }
    }

    /// Run all checks on an envelope that arrived in `context`.
    ///
    /// # Errors
    /// * `MessengerError::UnsupportedVersion` - Unknown envelope format
    /// * `MessengerError::Certificate` - Unknown claim or invalid proof
    /// * `MessengerError::Stale` - Correlation id outside the window
    /// * `MessengerError::ReplayDetected` - Pair already delivered
    pub async fn accept(&self, envelope: &Envelope, context: &CertificateContext) -> Result<(), MessengerError> {
        if !envelope.is_supported_version() {
            warn!(
                version = envelope.version,
                correlation_id = %envelope.correlation_id,
                "Rejected envelope with unsupported version"
            );
            return Err(MessengerError::UnsupportedVersion {
                version: envelope.version,
            });
        }

        self.authenticate(&envelope.certificate, envelope.correlation_id, context)
            .await
    }

    /// Verify a certificate for `correlation_id` in `context` and apply the
    /// replay guard.
    ///
    /// # Errors
    /// * `MessengerError::Certificate` - Unknown claim, invalid proof or a
    ///   certificate made for another context
    /// * `MessengerError::Stale` - Correlation id outside the window
    /// * `MessengerError::ReplayDetected` - Pair already delivered
    pub async fn authenticate(
        &self,
        certificate: &Certificate,
        correlation_id: Uuid,
        context: &CertificateContext,
    ) -> Result<(), MessengerError> {
        if let Err(e) = self
            .issuer
            .verify(certificate, correlation_id, context, self.directory.as_ref())
            .await
        {
            warn!(
                claim = %certificate.claim,
                correlation_id = %correlation_id,
                context = %context,
                kind = %e.kind(),
                error = %e,
                "Rejected inbound certificate"
            );
            return Err(e.into());
        }

        if let Some(cache) = &self.replay_cache {
            let recorded = cache
                .lock()
                .check_and_record(&certificate.claim, correlation_id);
            if let Err(e) = recorded {
                warn!(
                    claim = %certificate.claim,
                    correlation_id = %correlation_id,
                    duplicate = e.is_duplicate(),
                    error = %e,
                    "Rejected replayed or stale envelope"
                );
                return Err(e.into());
            }
        }

        Ok(())
    }

    /// Whether the replay guard is active.
    #[must_use]
    pub fn replay_protection(&self) -> bool {
        self.replay_cache.is_some()
    }
}
