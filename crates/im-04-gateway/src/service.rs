//! # Gateway Service
//!
//! `GatewayRepository` opens gateways; a `Gateway` moves one protocol's
//! messages over topics of the shared provider.
//!
//! ## Deployment Modes
//!
//! | Mode | Outbound | Inbound | Sender reported |
//! |------|----------|---------|-----------------|
//! | raw | handler check | handler check | `None` |
//! | authenticated | handler check + certificate | certificate + replay + handler check | `Some(claim)` |
//!
//! ## Inbound Steps
//!
//! 1. Decode the `GatewayMessage`; check version and protocol name
//! 2. Authenticated mode: verify the certificate for the message's
//!    correlation id and for this gateway's own protocol and identity, then
//!    apply the freshness and replay checks
//! 3. Validate the content with the handler
//!
//! Every failure goes to `on_error`.

use crate::domain::errors::GatewayError;
use crate::domain::handler::ProtocolHandler;
use crate::domain::registry::HandlerRegistry;
use crate::domain::wire::{gateway_topic, GatewayMessage};
use crate::ports::inbound::{GatewayApi, GatewayErrorCallback, GatewayMessageCallback};
use async_trait::async_trait;
use im_01_certificate_authority::{
    CertificateAuthority, CertificateContext, CertificateIssuer, DirectoryLookup, IdentityClaim,
};
use im_02_secure_messenger::{EnvelopeVerifier, MessengerConfig};
use parking_lot::Mutex;
use shared_bus::{PubSubProvider, TransportError};
use shared_types::{new_correlation_id, Identity, ProtocolMessage};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Receive-side settings of authenticated gateways.
pub type GatewayConfig = MessengerConfig;

struct Authentication {
    directory: Arc<dyn DirectoryLookup>,
    issuer: Arc<dyn CertificateIssuer>,
    config: GatewayConfig,
}

/// Opens gateways over one shared provider and a fixed handler registry.
pub struct GatewayRepository {
    registry: Arc<HandlerRegistry>,
    provider: Arc<dyn PubSubProvider>,
    authentication: Option<Authentication>,
}

impl GatewayRepository {
    /// Raw mode: gateways sit directly on the transport.
    pub fn new(registry: HandlerRegistry, provider: Arc<dyn PubSubProvider>) -> Self {
        Self {
            registry: Arc::new(registry),
            provider,
            authentication: None,
        }
    }

    /// Authenticated mode, verifying senders against `directory`.
    #[must_use]
    pub fn with_authentication(mut self, directory: Arc<dyn DirectoryLookup>) -> Self {
        self.authentication = Some(Authentication {
            directory,
            issuer: Arc::new(CertificateAuthority::new()),
            config: GatewayConfig::default(),
        });
        self
    }

    /// Replace the certificate issuer. No effect in raw mode.
    #[must_use]
    pub fn with_issuer(mut self, issuer: Arc<dyn CertificateIssuer>) -> Self {
        if let Some(auth) = self.authentication.as_mut() {
            auth.issuer = issuer;
        }
        self
    }

    /// Replace the replay guard settings. No effect in raw mode.
    #[must_use]
    pub fn with_config(mut self, config: GatewayConfig) -> Self {
        if let Some(auth) = self.authentication.as_mut() {
            auth.config = config;
        }
        self
    }

    /// Whether gateways opened here authenticate their messages.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authentication.is_some()
    }

    /// The handler registry.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Open a gateway for `protocol`.
    ///
    /// # Errors
    /// * `GatewayError::UnsupportedProtocol` - No handler registered under
    ///   exactly that name; no gateway is constructed
    pub fn open_gateway(
        &self,
        protocol: &str,
        self_claim: Option<IdentityClaim>,
    ) -> Result<Gateway, GatewayError> {
        let handler = self
            .registry
            .get(protocol)
            .ok_or_else(|| GatewayError::UnsupportedProtocol {
                protocol: protocol.to_string(),
            })?;

        let auth = self.authentication.as_ref().map(|auth| GatewayAuth {
            issuer: auth.issuer.clone(),
            verifier: Arc::new(EnvelopeVerifier::new(
                auth.issuer.clone(),
                auth.directory.clone(),
                &auth.config,
            )),
        });

        info!(
            protocol = protocol,
            identity = ?self_claim.as_ref().map(|claim| claim.identity().to_string()),
            authenticated = auth.is_some(),
            "Gateway opened"
        );

        Ok(Gateway {
            inbound: Arc::new(Inbound {
                handler,
                verifier: auth.as_ref().map(|auth| auth.verifier.clone()),
            }),
            provider: self.provider.clone(),
            self_claim,
            issuer: auth.map(|auth| auth.issuer),
            listener: Mutex::new(None),
        })
    }
}

struct GatewayAuth {
    issuer: Arc<dyn CertificateIssuer>,
    verifier: Arc<EnvelopeVerifier>,
}

/// Receive pipeline, shared with the listener task.
struct Inbound {
    handler: Arc<dyn ProtocolHandler>,
    /// `Some` in authenticated mode.
    verifier: Option<Arc<EnvelopeVerifier>>,
}

impl Inbound {
    fn protocol(&self) -> &str {
        self.handler.name()
    }

    fn malformed(&self, reason: impl Into<String>) -> GatewayError {
        GatewayError::Malformed {
            protocol: self.protocol().to_string(),
            reason: reason.into(),
        }
    }

    /// Decode and check one message that arrived on the topic of `recipient`.
    async fn process(
        &self,
        bytes: &[u8],
        recipient: &Identity,
    ) -> Result<(ProtocolMessage, Option<Identity>), GatewayError> {
        let wire: GatewayMessage =
            serde_json::from_slice(bytes).map_err(|e| self.malformed(e.to_string()))?;

        if wire.version != GatewayMessage::CURRENT_VERSION {
            return Err(GatewayError::UnsupportedVersion {
                version: wire.version,
            });
        }
        if wire.protocol != self.protocol() {
            return Err(self.malformed(format!("addressed to protocol '{}'", wire.protocol)));
        }

        let sender = match &self.verifier {
            Some(verifier) => {
                let certificate = wire.certificate.as_ref().ok_or_else(|| GatewayError::Unauthenticated {
                    protocol: self.protocol().to_string(),
                })?;
                let context = CertificateContext::gateway(self.protocol(), recipient);
                verifier
                    .authenticate(certificate, wire.correlation_id, &context)
                    .await?;
                Some(certificate.claim.clone())
            }
            None => None,
        };

        if !self.handler.validate(&wire.message) {
            return Err(self.malformed(format!(
                "'{}' rejected by handler",
                wire.message.message_type
            )));
        }

        Ok((wire.message, sender))
    }
}

/// An open gateway bound to one protocol handler.
pub struct Gateway {
    inbound: Arc<Inbound>,
    provider: Arc<dyn PubSubProvider>,
    self_claim: Option<IdentityClaim>,
    /// `Some` in authenticated mode.
    issuer: Option<Arc<dyn CertificateIssuer>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Gateway {
    /// Own identity, if the gateway was opened with a self claim.
    #[must_use]
    pub fn self_identity(&self) -> Option<&Identity> {
        self.self_claim.as_ref().map(IdentityClaim::identity)
    }

    /// Whether this gateway authenticates its messages.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.issuer.is_some()
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
impl GatewayApi for Gateway {
    fn protocol(&self) -> &str {
        self.inbound.protocol()
    }

    async fn send(&self, message: &ProtocolMessage, recipient: &Identity) -> Result<Uuid, GatewayError> {
        if !self.inbound.handler.validate(message) {
            return Err(self.inbound.malformed(format!(
                "'{}' rejected by handler",
                message.message_type
            )));
        }

        let correlation_id = new_correlation_id();
        let certificate = match &self.issuer {
            Some(issuer) => {
                let claim = self.self_claim.as_ref().ok_or(GatewayError::MissingSelfClaim)?;
                let context = CertificateContext::gateway(self.protocol(), recipient);
                Some(
                    issuer
                        .make(claim.identity(), claim.signer(), correlation_id, &context)
                        .await?,
                )
            }
            None => None,
        };

        let topic = gateway_topic(self.protocol(), recipient);
        let wire = GatewayMessage::new(self.protocol(), correlation_id, certificate, message.clone());
        let bytes = serde_json::to_vec(&wire).map_err(|e| TransportError::Encode {
            topic: topic.clone(),
            reason: e.to_string(),
        })?;

        self.provider.publish(&topic, bytes).await?;

        debug!(
            topic = %topic,
            message_type = %message.message_type,
            correlation_id = %correlation_id,
            "Gateway message sent"
        );
        Ok(correlation_id)
    }

    fn listen(
        &self,
        on_message: GatewayMessageCallback,
        on_error: GatewayErrorCallback,
    ) -> Result<(), GatewayError> {
        let identity = self
            .self_identity()
            .ok_or(GatewayError::MissingSelfClaim)?
            .clone();

        let mut slot = self.listener.lock();
        if let Some(previous) = slot.take() {
            previous.abort();
            info!(protocol = self.protocol(), identity = %identity, "Replacing active gateway listener");
        }

        let topic = gateway_topic(self.protocol(), &identity);
        let mut subscription = self.provider.subscribe(&topic)?;
        let inbound = self.inbound.clone();

        info!(topic = %topic, "Gateway listening");

        *slot = Some(tokio::spawn(async move {
            while let Some(bytes) = subscription.recv().await {
                match inbound.process(&bytes, &identity).await {
                    Ok((message, sender)) => {
                        debug!(
                            topic = subscription.topic(),
                            message_type = %message.message_type,
                            "Gateway message delivered"
                        );
                        on_message(message, sender);
                    }
                    Err(e) => {
                        warn!(
                            topic = subscription.topic(),
                            kind = %e.kind(),
                            error = %e,
                            "Rejected inbound gateway message"
                        );
                        on_error(e);
                    }
                }
            }
        }));

        Ok(())
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        if let Some(task) = self.listener.get_mut().take() {
            task.abort();
        }
    }
}
