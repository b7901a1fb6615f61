//! # Topic Subscription
//!
//! Defines the receiving side of a topic.

use crate::errors::TransportError;
use crate::provider::Topic;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Live topics of a provider, keyed by name.
pub(crate) type TopicTable = Arc<RwLock<HashMap<String, Topic>>>;

/// A subscription handle for receiving raw messages on one topic.
///
/// When dropped, the subscription is automatically cleaned up; the last one
/// on a topic removes the topic from its provider.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<Vec<u8>>,

    /// Topic this subscription listens on.
    topic: String,

    /// Provider's topic table (for cleanup).
    topics: TopicTable,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(
        receiver: broadcast::Receiver<Vec<u8>>,
        topic: String,
        topics: TopicTable,
    ) -> Self {
        Self {
            receiver,
            topic,
            topics,
        }
    }

    /// Receive the next message published on the topic.
    ///
    /// # Returns
    ///
    /// - `Some(bytes)` - The next message, in publish order
    /// - `None` - The channel was closed (provider dropped)
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(
                        topic = %self.topic,
                        lagged = count,
                        "Subscriber lagged, some messages dropped"
                    );
                }
            }
        }
    }

    /// Try to receive the next message without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bytes))` - A message was available
    /// - `Ok(None)` - No message available (would block)
    /// - `Err(TransportError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Ok(Some(message)),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => return Err(TransportError::Closed),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            }
        }
    }

    /// The topic this subscription listens on.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut topics = self.topics.write();
        if let Some(entry) = topics.get_mut(&self.topic) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                topics.remove(&self.topic);
            }
        }
        debug!(topic = %self.topic, "Subscription dropped");
    }
}
