//! # Messaging Node
//!
//! Owns the shared infrastructure and hands out messengers and gateway
//! repositories built on it.
//!
//! ## Wiring
//!
//! ```text
//!                 ┌──────────────────────┐
//!  provision() ──►│  InMemoryDirectory   │◄── verify (every receiver)
//!                 └──────────────────────┘
//!                 ┌──────────────────────┐
//!  messenger() ──►│ PubSubClientFactory  │── inbound/<identity>
//!                 └──────────┬───────────┘
//!                            ▼
//!                 ┌──────────────────────┐
//!  gateways()  ──►│ InMemoryPubSubProvider│── gateway/<protocol>/<identity>
//!                 └──────────────────────┘
//! ```

use crate::container::config::NodeConfig;
use im_01_certificate_authority::{
    CertificateAuthority, CertificateIssuer, IdentityClaim, InMemoryDirectory, KeyPairSigner, Signer,
};
use im_02_secure_messenger::SecureIdentityMessenger;
use im_03_protocol_messenger::{payments_protocol, ProtocolMessenger};
use im_04_gateway::{GatewayRepository, HandlerRegistry};
use parking_lot::RwLock;
use shared_bus::{InMemoryPubSubClientFactory, InMemoryPubSubProvider, PubSubProvider};
use shared_types::{Identity, IdentityError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from provisioning identities.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The subdomain does not form a valid identity with the node's domain.
    #[error("Invalid identity: {0}")]
    InvalidIdentity(#[from] IdentityError),

    /// The identity already has a key on this node.
    #[error("Identity {identity} is already provisioned")]
    AlreadyProvisioned { identity: Identity },
}

/// Central container for one node's messaging stack.
pub struct MessagingNode {
    config: NodeConfig,
    directory: Arc<InMemoryDirectory>,
    provider: Arc<InMemoryPubSubProvider>,
    clients: Arc<InMemoryPubSubClientFactory>,
    issuer: Arc<dyn CertificateIssuer>,
    registry: HandlerRegistry,
    claims: RwLock<HashMap<Identity, IdentityClaim>>,
}

impl MessagingNode {
    /// Build the shared infrastructure from configuration.
    pub fn new(config: NodeConfig) -> Self {
        let provider = Arc::new(InMemoryPubSubProvider::from_config(&config.bus));
        let shared: Arc<dyn PubSubProvider> = provider.clone();

        info!(
            domain = %config.domain,
            channel_capacity = config.bus.channel_capacity,
            replay_protection = config.messenger.replay_protection,
            "Messaging node created"
        );

        Self {
            config,
            directory: Arc::new(InMemoryDirectory::new()),
            clients: Arc::new(InMemoryPubSubClientFactory::new(shared)),
            provider,
            issuer: Arc::new(CertificateAuthority::new()),
            registry: HandlerRegistry::with_defaults(),
            claims: RwLock::new(HashMap::new()),
        }
    }

    /// The configuration this node was built from.
    #[must_use]
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The identity directory.
    #[must_use]
    pub fn directory(&self) -> &Arc<InMemoryDirectory> {
        &self.directory
    }

    /// The shared topic provider.
    #[must_use]
    pub fn provider(&self) -> &Arc<InMemoryPubSubProvider> {
        &self.provider
    }

    /// Generate a key for `subdomain@<domain>` and register it.
    ///
    /// # Errors
    /// * `NodeError::InvalidIdentity` - `subdomain` is not a valid subdomain
    /// * `NodeError::AlreadyProvisioned` - The identity already has a key here
    pub fn provision(&self, subdomain: &str) -> Result<IdentityClaim, NodeError> {
        let identity = Identity::new(subdomain, &self.config.domain)?;

        let mut claims = self.claims.write();
        if claims.contains_key(&identity) {
            return Err(NodeError::AlreadyProvisioned { identity });
        }

        let signer = KeyPairSigner::generate();
        self.directory.register(identity.clone(), signer.public_key());
        let claim = IdentityClaim::new(identity.clone(), Arc::new(signer));
        claims.insert(identity.clone(), claim.clone());

        info!(identity = %identity, "Identity provisioned");
        Ok(claim)
    }

    /// Claim of an identity provisioned on this node.
    #[must_use]
    pub fn claim(&self, identity: &Identity) -> Option<IdentityClaim> {
        self.claims.read().get(identity).cloned()
    }

    /// A secure messenger speaking for `claim`.
    pub fn messenger(&self, claim: IdentityClaim) -> SecureIdentityMessenger {
        SecureIdentityMessenger::new(
            claim,
            self.directory.clone(),
            self.clients.clone(),
            self.issuer.clone(),
            &self.config.messenger,
        )
    }

    /// A payment protocol messenger speaking for `claim`.
    pub fn payments_messenger(&self, claim: IdentityClaim) -> ProtocolMessenger<SecureIdentityMessenger> {
        ProtocolMessenger::new(self.messenger(claim), payments_protocol())
    }

    /// Gateway repository sitting directly on the transport.
    pub fn raw_gateways(&self) -> GatewayRepository {
        GatewayRepository::new(self.registry.clone(), self.provider.clone())
    }

    /// Gateway repository that certifies and verifies every message.
    pub fn authenticated_gateways(&self) -> GatewayRepository {
        self.raw_gateways()
            .with_authentication(self.directory.clone())
            .with_issuer(self.issuer.clone())
            .with_config(self.config.messenger.clone())
    }
}
