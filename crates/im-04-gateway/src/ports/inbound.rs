//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::GatewayError;
use async_trait::async_trait;
use shared_types::{Identity, ProtocolMessage};
use uuid::Uuid;

/// Invoked with `(message, sender)`. The sender is `Some` only when the
/// gateway verified the message's certificate.
pub type GatewayMessageCallback = Box<dyn Fn(ProtocolMessage, Option<Identity>) + Send + Sync>;

/// Invoked for every rejected inbound message.
pub type GatewayErrorCallback = Box<dyn Fn(GatewayError) + Send + Sync>;

/// An open gateway for one protocol.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Name of the protocol handler this gateway is bound to.
    fn protocol(&self) -> &str;

    /// Validate `message` with the handler and publish it to `recipient`.
    ///
    /// # Errors
    /// * `GatewayError::Malformed` - Rejected by the handler; no I/O
    /// * `GatewayError::MissingSelfClaim` - Authenticated gateway without a
    ///   self claim; no I/O
    /// * `GatewayError::Certificate` / `GatewayError::Transport` - Passed through
    async fn send(&self, message: &ProtocolMessage, recipient: &Identity) -> Result<Uuid, GatewayError>;

    /// Subscribe to this gateway's own topic. A second call replaces the
    /// previous callback pair.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// * `GatewayError::MissingSelfClaim` - No identity to listen for
    /// * `GatewayError::Transport` - The subscription could not be created
    fn listen(
        &self,
        on_message: GatewayMessageCallback,
        on_error: GatewayErrorCallback,
    ) -> Result<(), GatewayError>;
}
