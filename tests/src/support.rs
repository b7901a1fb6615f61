//! # Test Fixtures
//!
//! A `Network` bundles one directory and one topic provider, with a
//! `RecordingClientFactory` in front of the per-recipient clients so tests
//! can count transport calls and capture envelopes as an eavesdropper would.

use async_trait::async_trait;
use im_01_certificate_authority::{
    CertificateAuthority, CertificateIssuer, IdentityClaim, InMemoryDirectory, KeyPairSigner, Signer,
};
use im_02_secure_messenger::{MessengerConfig, MessengerError, SecureIdentityMessenger, SecureMessengerApi};
use im_03_protocol_messenger::{ProtocolError, ProtocolMessengerApi, PAYMENT_REQUEST};
use im_04_gateway::{GatewayApi, GatewayError, GatewayRepository, HandlerRegistry};
use parking_lot::Mutex;
use serde_json::json;
use shared_bus::{
    EnvelopeSubscription, InMemoryPubSubClientFactory, InMemoryPubSubProvider, PubSubClient,
    PubSubClientFactory, PubSubProvider, TransportError,
};
use shared_types::{Envelope, Identity, ProtocolMessage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Upper bound for any expected callback.
pub const WAIT: Duration = Duration::from_millis(500);

/// How long to watch for a callback that must not fire.
pub const QUIET: Duration = Duration::from_millis(50);

/// The asset id used by the payment request fixtures.
pub const ASSET_ID: &str = "7c3baa3c-f5e8-490a-88a1-e0a052b7caa4";

/// Parse a fixture identity.
pub fn identity(s: &str) -> Identity {
    Identity::parse(s).unwrap()
}

/// `{type: PAYMENT_REQUEST, content: {amount: "1", assetId, toAddress}}`.
pub fn payment_request() -> ProtocolMessage {
    ProtocolMessage::new(
        PAYMENT_REQUEST,
        json!({
            "amount": "1",
            "assetId": ASSET_ID,
            "toAddress": "randomAddress",
        }),
    )
}

/// `{type: PAYMENT_REQUEST, content: {foo: "bar"}}`.
pub fn malformed_payment_request() -> ProtocolMessage {
    ProtocolMessage::new(PAYMENT_REQUEST, json!({ "foo": "bar" }))
}

// =============================================================================
// TRANSPORT SPY
// =============================================================================

/// Client factory that records every publish going through it.
pub struct RecordingClientFactory {
    inner: InMemoryPubSubClientFactory,
    published: Arc<Mutex<Vec<Envelope>>>,
    calls: Arc<AtomicUsize>,
}

impl RecordingClientFactory {
    pub fn new(provider: Arc<dyn PubSubProvider>) -> Self {
        Self {
            inner: InMemoryPubSubClientFactory::new(provider),
            published: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every `client_for` and `publish` call made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Envelopes published so far, in order.
    pub fn published(&self) -> Vec<Envelope> {
        self.published.lock().clone()
    }

    /// Publish an arbitrary envelope to `recipient`'s channel, bypassing
    /// any messenger.
    pub async fn inject(&self, recipient: &Identity, envelope: Envelope) {
        self.inner
            .client_for(recipient)
            .unwrap()
            .publish(envelope)
            .await
            .unwrap();
    }
}

impl PubSubClientFactory for RecordingClientFactory {
    fn client_for(&self, identity: &Identity) -> Result<Arc<dyn PubSubClient>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(RecordingClient {
            inner: self.inner.client_for(identity)?,
            published: self.published.clone(),
            calls: self.calls.clone(),
        }))
    }
}

struct RecordingClient {
    inner: Arc<dyn PubSubClient>,
    published: Arc<Mutex<Vec<Envelope>>>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PubSubClient for RecordingClient {
    fn channel(&self) -> &str {
        self.inner.channel()
    }

    async fn publish(&self, envelope: Envelope) -> Result<usize, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.published.lock().push(envelope.clone());
        self.inner.publish(envelope).await
    }

    fn subscribe(&self) -> Result<EnvelopeSubscription, TransportError> {
        self.inner.subscribe()
    }
}

// =============================================================================
// NETWORK
// =============================================================================

/// Shared infrastructure for one test.
pub struct Network {
    pub provider: Arc<InMemoryPubSubProvider>,
    pub directory: Arc<InMemoryDirectory>,
    pub clients: Arc<RecordingClientFactory>,
    pub issuer: Arc<dyn CertificateIssuer>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    pub fn new() -> Self {
        let provider = Arc::new(InMemoryPubSubProvider::new());
        let shared: Arc<dyn PubSubProvider> = provider.clone();
        Self {
            provider,
            directory: Arc::new(InMemoryDirectory::new()),
            clients: Arc::new(RecordingClientFactory::new(shared)),
            issuer: Arc::new(CertificateAuthority::new()),
        }
    }

    /// Generate a key for `name` and register it in the directory.
    pub fn register(&self, name: &str) -> IdentityClaim {
        let signer = KeyPairSigner::generate();
        self.directory.register(identity(name), signer.public_key());
        IdentityClaim::new(identity(name), Arc::new(signer))
    }

    /// Messenger with default configuration.
    pub fn messenger(&self, claim: IdentityClaim) -> SecureIdentityMessenger {
        self.messenger_with(claim, &MessengerConfig::default())
    }

    pub fn messenger_with(&self, claim: IdentityClaim, config: &MessengerConfig) -> SecureIdentityMessenger {
        SecureIdentityMessenger::new(
            claim,
            self.directory.clone(),
            self.clients.clone(),
            self.issuer.clone(),
            config,
        )
    }

    pub fn raw_gateways(&self) -> GatewayRepository {
        GatewayRepository::new(HandlerRegistry::with_defaults(), self.provider.clone())
    }

    pub fn authenticated_gateways(&self) -> GatewayRepository {
        self.raw_gateways().with_authentication(self.directory.clone())
    }
}

// =============================================================================
// CALLBACK COLLECTORS
// =============================================================================

/// Channels fed by a listener's `on_message` and `on_error`.
pub struct Inbox<M, E> {
    pub messages: mpsc::UnboundedReceiver<M>,
    pub errors: mpsc::UnboundedReceiver<E>,
}

impl<M, E> Inbox<M, E> {
    /// Next delivered message, or panic after `WAIT`.
    pub async fn next_message(&mut self) -> M {
        tokio::time::timeout(WAIT, self.messages.recv())
            .await
            .expect("timed out waiting for message")
            .expect("listener stopped")
    }

    /// Next reported error, or panic after `WAIT`.
    pub async fn next_error(&mut self) -> E {
        tokio::time::timeout(WAIT, self.errors.recv())
            .await
            .expect("timed out waiting for error")
            .expect("listener stopped")
    }

    /// Whether nothing was delivered within `QUIET`.
    pub async fn no_message(&mut self) -> bool {
        tokio::time::timeout(QUIET, self.messages.recv()).await.is_err()
    }

    /// Whether no error was reported within `QUIET`.
    pub async fn no_error(&mut self) -> bool {
        tokio::time::timeout(QUIET, self.errors.recv()).await.is_err()
    }
}

pub type MessengerInbox = Inbox<(Vec<u8>, Identity), MessengerError>;
pub type ProtocolInbox = Inbox<(ProtocolMessage, Identity), ProtocolError>;
pub type GatewayInbox = Inbox<(ProtocolMessage, Option<Identity>), GatewayError>;

/// Senders for an `Inbox`, to move into the two callbacks.
pub fn inbox<M, E>() -> (mpsc::UnboundedSender<M>, mpsc::UnboundedSender<E>, Inbox<M, E>) {
    let (msg_tx, messages) = mpsc::unbounded_channel();
    let (err_tx, errors) = mpsc::unbounded_channel();
    (msg_tx, err_tx, Inbox { messages, errors })
}

/// Start `messenger` listening into a fresh inbox.
pub fn listen_messenger<M: SecureMessengerApi>(messenger: &M) -> MessengerInbox {
    let (msg_tx, err_tx, inbox) = inbox();
    messenger
        .listen(
            Box::new(move |payload: Vec<u8>, sender: Identity| {
                let _ = msg_tx.send((payload, sender));
            }),
            Box::new(move |e: MessengerError| {
                let _ = err_tx.send(e);
            }),
        )
        .unwrap();
    inbox
}

/// Start a protocol messenger listening into a fresh inbox.
pub fn listen_protocol<P: ProtocolMessengerApi>(messenger: &P) -> ProtocolInbox {
    let (msg_tx, err_tx, inbox) = inbox();
    messenger
        .listen(
            Box::new(move |message: ProtocolMessage, sender: Identity| {
                let _ = msg_tx.send((message, sender));
            }),
            Box::new(move |e: ProtocolError| {
                let _ = err_tx.send(e);
            }),
        )
        .unwrap();
    inbox
}

/// Start a gateway listening into a fresh inbox.
pub fn listen_gateway<G: GatewayApi>(gateway: &G) -> GatewayInbox {
    let (msg_tx, err_tx, inbox) = inbox();
    gateway
        .listen(
            Box::new(move |message: ProtocolMessage, sender: Option<Identity>| {
                let _ = msg_tx.send((message, sender));
            }),
            Box::new(move |e: GatewayError| {
                let _ = err_tx.send(e);
            }),
        )
        .unwrap();
    inbox
}
