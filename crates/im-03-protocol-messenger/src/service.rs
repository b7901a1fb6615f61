//! # Protocol Messenger Service
//!
//! Wraps a `SecureMessengerApi` with a fixed `ProtocolDefinition`.
//!
//! Authentication (who sent it) is the wrapped messenger's job; this layer
//! only decides whether the content is well-formed for its declared type.
//! Both must pass before a message reaches `on_message`.

use crate::domain::definition::ProtocolDefinition;
use crate::domain::errors::{MalformedReason, ProtocolError};
use crate::ports::inbound::{ProtocolErrorCallback, ProtocolMessageCallback, ProtocolMessengerApi};
use async_trait::async_trait;
use im_02_secure_messenger::{MessengerError, SecureMessengerApi};
use shared_types::{Identity, ProtocolMessage};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Protocol-validating messenger.
pub struct ProtocolMessenger<M: SecureMessengerApi> {
    messenger: M,
    protocol: Arc<ProtocolDefinition>,
}

impl<M: SecureMessengerApi> ProtocolMessenger<M> {
    /// Wrap `messenger` with `protocol`.
    pub fn new(messenger: M, protocol: ProtocolDefinition) -> Self {
        Self {
            messenger,
            protocol: Arc::new(protocol),
        }
    }

    /// The wrapped messenger.
    pub fn messenger(&self) -> &M {
        &self.messenger
    }
}

fn decode(protocol: &ProtocolDefinition, payload: &[u8]) -> Result<ProtocolMessage, ProtocolError> {
    let message = ProtocolMessage::from_bytes(payload)
        .map_err(|e| protocol.malformed(MalformedReason::Undecodable(e.to_string())))?;
    protocol.check(&message)?;
    Ok(message)
}

#[async_trait]
impl<M: SecureMessengerApi> ProtocolMessengerApi for ProtocolMessenger<M> {
    fn protocol(&self) -> &ProtocolDefinition {
        &self.protocol
    }

    async fn send(&self, message: &ProtocolMessage, recipient: &Identity) -> Result<Uuid, ProtocolError> {
        self.protocol.check(message)?;

        let payload = message
            .to_bytes()
            .map_err(|e| self.protocol.malformed(MalformedReason::Undecodable(e.to_string())))?;

        let correlation_id = self.messenger.send(&payload, recipient).await?;
        debug!(
            protocol = self.protocol.name(),
            message_type = %message.message_type,
            to = %recipient,
            correlation_id = %correlation_id,
            "Protocol message sent"
        );
        Ok(correlation_id)
    }

    fn listen(
        &self,
        on_message: ProtocolMessageCallback,
        on_error: ProtocolErrorCallback,
    ) -> Result<(), ProtocolError> {
        let on_error: Arc<dyn Fn(ProtocolError) + Send + Sync> = Arc::from(on_error);
        let report_malformed = on_error.clone();
        let protocol = self.protocol.clone();

        self.messenger.listen(
            Box::new(move |payload: Vec<u8>, sender: Identity| match decode(&protocol, &payload) {
                Ok(message) => on_message(message, sender),
                Err(e) => {
                    warn!(
                        protocol = protocol.name(),
                        from = %sender,
                        error = %e,
                        "Rejected malformed protocol message"
                    );
                    report_malformed(e);
                }
            }),
            Box::new(move |e: MessengerError| on_error(e.into())),
        )?;

        Ok(())
    }
}
