//! # Per-Recipient Clients
//!
//! Point-to-point messaging addresses each identity's inbound channel
//! through a client obtained from a factory. Senders ask for the recipient's
//! client and publish; listeners ask for their own client and subscribe.

use crate::errors::TransportError;
use crate::provider::PubSubProvider;
use crate::subscriber::Subscription;
use crate::INBOUND_TOPIC_PREFIX;
use async_trait::async_trait;
use shared_types::{Envelope, Identity};
use std::sync::Arc;
use tracing::debug;

/// The inbound channel name for an identity.
#[must_use]
pub fn inbound_channel(identity: &Identity) -> String {
    format!("{INBOUND_TOPIC_PREFIX}{identity}")
}

/// A transport client scoped to one identity's inbound channel.
#[async_trait]
pub trait PubSubClient: Send + Sync {
    /// Channel this client is bound to.
    fn channel(&self) -> &str;

    /// Publish an envelope to the channel.
    ///
    /// Returns once the transport has accepted the publish; the value is
    /// the number of subscribers that received it.
    async fn publish(&self, envelope: Envelope) -> Result<usize, TransportError>;

    /// Subscribe to envelopes arriving on the channel.
    fn subscribe(&self) -> Result<EnvelopeSubscription, TransportError>;
}

/// Creates clients bound to an identity's inbound channel.
pub trait PubSubClientFactory: Send + Sync {
    /// Obtain a client for `identity`.
    ///
    /// # Errors
    ///
    /// Fails if the transport cannot address the identity's channel.
    fn client_for(&self, identity: &Identity) -> Result<Arc<dyn PubSubClient>, TransportError>;
}

/// A stream of decoded envelopes from one inbound channel.
pub struct EnvelopeSubscription {
    inner: Subscription,
}

impl EnvelopeSubscription {
    /// Wrap a raw topic subscription carrying JSON-encoded envelopes.
    #[must_use]
    pub fn new(inner: Subscription) -> Self {
        Self { inner }
    }

    /// Receive the next envelope.
    ///
    /// # Returns
    ///
    /// - `Some(Ok(envelope))` - A decoded envelope, still unverified
    /// - `Some(Err(TransportError::Decode { .. }))` - Bytes that are not an envelope
    /// - `None` - The channel was closed
    pub async fn recv(&mut self) -> Option<Result<Envelope, TransportError>> {
        let bytes = self.inner.recv().await?;
        Some(
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode {
                topic: self.inner.topic().to_string(),
                reason: e.to_string(),
            }),
        )
    }

    /// The channel this subscription listens on.
    #[must_use]
    pub fn channel(&self) -> &str {
        self.inner.topic()
    }
}

/// Client over an identity's inbound topic on a shared provider.
pub struct InMemoryPubSubClient {
    provider: Arc<dyn PubSubProvider>,
    channel: String,
}

#[async_trait]
impl PubSubClient for InMemoryPubSubClient {
    fn channel(&self) -> &str {
        &self.channel
    }

    async fn publish(&self, envelope: Envelope) -> Result<usize, TransportError> {
        let bytes = serde_json::to_vec(&envelope).map_err(|e| TransportError::Encode {
            topic: self.channel.clone(),
            reason: e.to_string(),
        })?;

        let receivers = self.provider.publish(&self.channel, bytes).await?;
        debug!(
            channel = %self.channel,
            correlation_id = %envelope.correlation_id,
            receivers = receivers,
            "Envelope published"
        );
        Ok(receivers)
    }

    fn subscribe(&self) -> Result<EnvelopeSubscription, TransportError> {
        Ok(EnvelopeSubscription::new(
            self.provider.subscribe(&self.channel)?,
        ))
    }
}

/// Factory handing out `InMemoryPubSubClient`s over one shared provider.
#[derive(Clone)]
pub struct InMemoryPubSubClientFactory {
    provider: Arc<dyn PubSubProvider>,
}

impl InMemoryPubSubClientFactory {
    /// Create a factory over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn PubSubProvider>) -> Self {
        Self { provider }
    }
}

impl PubSubClientFactory for InMemoryPubSubClientFactory {
    fn client_for(&self, identity: &Identity) -> Result<Arc<dyn PubSubClient>, TransportError> {
        Ok(Arc::new(InMemoryPubSubClient {
            provider: self.provider.clone(),
            channel: inbound_channel(identity),
        }))
    }
}
