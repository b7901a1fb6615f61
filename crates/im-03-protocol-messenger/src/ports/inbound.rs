//! # Inbound Ports (Driving Ports / API)

use crate::domain::definition::ProtocolDefinition;
use crate::domain::errors::ProtocolError;
use async_trait::async_trait;
use shared_types::{Identity, ProtocolMessage};
use uuid::Uuid;

/// Invoked with `(message, sender)` for authenticated, well-formed messages.
pub type ProtocolMessageCallback = Box<dyn Fn(ProtocolMessage, Identity) + Send + Sync>;

/// Invoked for every rejected inbound message.
pub type ProtocolErrorCallback = Box<dyn Fn(ProtocolError) + Send + Sync>;

/// Typed messaging for one fixed protocol.
#[async_trait]
pub trait ProtocolMessengerApi: Send + Sync {
    /// The protocol messages are validated against.
    fn protocol(&self) -> &ProtocolDefinition;

    /// Validate and send `message` to `recipient`.
    ///
    /// # Errors
    /// * `ProtocolError::Malformed` - Rejected before any transport I/O
    /// * `ProtocolError::Messenger` - The secure messenger failed
    async fn send(&self, message: &ProtocolMessage, recipient: &Identity) -> Result<Uuid, ProtocolError>;

    /// Receive authenticated messages that also validate for the protocol.
    ///
    /// # Errors
    /// * `ProtocolError::Messenger` - The subscription could not be created
    fn listen(
        &self,
        on_message: ProtocolMessageCallback,
        on_error: ProtocolErrorCallback,
    ) -> Result<(), ProtocolError>;
}
