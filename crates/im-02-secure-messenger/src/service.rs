//! # Secure Identity Messenger Service
//!
//! Implements `SecureMessengerApi` over a per-recipient client factory.
//!
//! ## Send Path
//!
//! ```text
//! resolve(recipient) ─► client_for(recipient) ─► make(self, id, inbound/recipient) ─► publish(Envelope)
//! ```
//!
//! ## Receive Path
//!
//! ```text
//! subscribe(self) ─► EnvelopeVerifier::accept(inbound/self) ─► on_message(payload, claim)
//!                                   │
//!                                   └───────────────────────► on_error(error)
//! ```
//!
//! The single subscription slot holds the task driving the current
//! subscription. Replacing it or dropping the messenger aborts the task.

use crate::domain::config::MessengerConfig;
use crate::domain::errors::MessengerError;
use crate::ports::inbound::{ErrorCallback, MessageCallback, SecureMessengerApi};
use crate::verifier::EnvelopeVerifier;
use async_trait::async_trait;
use im_01_certificate_authority::{CertificateContext, CertificateIssuer, DirectoryLookup, IdentityClaim};
use parking_lot::Mutex;
use shared_bus::PubSubClientFactory;
use shared_types::{new_correlation_id, Envelope, Identity};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Point-to-point messenger that proves its sender identity on every message.
pub struct SecureIdentityMessenger {
    claim: IdentityClaim,
    directory: Arc<dyn DirectoryLookup>,
    clients: Arc<dyn PubSubClientFactory>,
    issuer: Arc<dyn CertificateIssuer>,
    verifier: Arc<EnvelopeVerifier>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SecureIdentityMessenger {
    /// Create a messenger for `claim`.
    ///
    /// # Arguments
    /// * `claim` - Own identity and the signer for its key
    /// * `directory` - Resolves recipients on send and senders on receive
    /// * `clients` - Per-recipient transport clients
    /// * `issuer` - Makes and verifies certificates
    /// * `config` - Replay guard settings
    pub fn new(
        claim: IdentityClaim,
        directory: Arc<dyn DirectoryLookup>,
        clients: Arc<dyn PubSubClientFactory>,
        issuer: Arc<dyn CertificateIssuer>,
        config: &MessengerConfig,
    ) -> Self {
        let verifier = Arc::new(EnvelopeVerifier::new(
            issuer.clone(),
            directory.clone(),
            config,
        ));

        Self {
            claim,
            directory,
            clients,
            issuer,
            verifier,
            listener: Mutex::new(None),
        }
    }

    /// Whether a subscription is currently active.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

#[async_trait]
impl SecureMessengerApi for SecureIdentityMessenger {
    fn identity(&self) -> &Identity {
        self.claim.identity()
    }

    async fn send(&self, payload: &[u8], recipient: &Identity) -> Result<Uuid, MessengerError> {
        if self.directory.resolve(recipient).await?.is_none() {
            return Err(MessengerError::UnknownIdentity {
                identity: recipient.clone(),
            });
        }

        let client = self.clients.client_for(recipient)?;

        let correlation_id = new_correlation_id();
        let certificate = self
            .issuer
            .make(
                self.claim.identity(),
                self.claim.signer(),
                correlation_id,
                &CertificateContext::inbound(recipient),
            )
            .await?;

        client
            .publish(Envelope::new(certificate, correlation_id, payload.to_vec()))
            .await?;

        debug!(
            from = %self.claim.identity(),
            to = %recipient,
            correlation_id = %correlation_id,
            bytes = payload.len(),
            "Message sent"
        );
        Ok(correlation_id)
    }

    fn listen(&self, on_message: MessageCallback, on_error: ErrorCallback) -> Result<(), MessengerError> {
        let mut slot = self.listener.lock();
        if let Some(previous) = slot.take() {
            previous.abort();
            info!(identity = %self.claim.identity(), "Replacing active listener");
        }

        let mut subscription = self.clients.client_for(self.claim.identity())?.subscribe()?;
        let verifier = self.verifier.clone();
        let identity = self.claim.identity().clone();
        let context = CertificateContext::inbound(&identity);

        info!(identity = %identity, channel = subscription.channel(), "Listening");

        *slot = Some(tokio::spawn(async move {
            while let Some(received) = subscription.recv().await {
                let envelope = match received {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        on_error(e.into());
                        continue;
                    }
                };

                match verifier.accept(&envelope, &context).await {
                    Ok(()) => {
                        debug!(
                            identity = %identity,
                            from = %envelope.certificate.claim,
                            correlation_id = %envelope.correlation_id,
                            "Message delivered"
                        );
                        on_message(envelope.payload, envelope.certificate.claim);
                    }
                    Err(e) => on_error(e),
                }
            }
            debug!(identity = %identity, "Inbound channel closed");
        }));

        Ok(())
    }
}

impl Drop for SecureIdentityMessenger {
    fn drop(&mut self) {
        if let Some(task) = self.listener.get_mut().take() {
            task.abort();
        }
    }
}
