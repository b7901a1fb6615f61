//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::MessengerError;
use async_trait::async_trait;
use shared_types::Identity;
use std::sync::Arc;
use uuid::Uuid;

/// Invoked with `(payload, sender)` for every authenticated message.
pub type MessageCallback = Box<dyn Fn(Vec<u8>, Identity) + Send + Sync>;

/// Invoked for every message that was rejected on receive.
pub type ErrorCallback = Box<dyn Fn(MessengerError) + Send + Sync>;

/// Authenticated point-to-point messaging.
#[async_trait]
pub trait SecureMessengerApi: Send + Sync {
    /// The identity this messenger sends as and listens for.
    fn identity(&self) -> &Identity;

    /// Send `payload` to `recipient`.
    ///
    /// Returns the correlation id of the published envelope once the
    /// transport accepted it.
    ///
    /// # Errors
    /// * `MessengerError::UnknownIdentity` - The recipient is not in the directory
    /// * `MessengerError::Certificate` - The certificate could not be made
    /// * `MessengerError::Transport` / `MessengerError::Directory` - Passed through
    async fn send(&self, payload: &[u8], recipient: &Identity) -> Result<Uuid, MessengerError>;

    /// Subscribe to this identity's inbound channel.
    ///
    /// Returns as soon as the subscription exists. Rejected messages reach
    /// `on_error` only; `on_message` sees authenticated payloads only. A
    /// second call replaces the previous callback pair.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// * `MessengerError::Transport` - The subscription could not be created
    fn listen(&self, on_message: MessageCallback, on_error: ErrorCallback) -> Result<(), MessengerError>;
}

#[async_trait]
impl<T: SecureMessengerApi + ?Sized> SecureMessengerApi for Arc<T> {
    fn identity(&self) -> &Identity {
        (**self).identity()
    }

    async fn send(&self, payload: &[u8], recipient: &Identity) -> Result<Uuid, MessengerError> {
        (**self).send(payload, recipient).await
    }

    fn listen(&self, on_message: MessageCallback, on_error: ErrorCallback) -> Result<(), MessengerError> {
        (**self).listen(on_message, on_error)
    }
}
