//! # Topic Provider
//!
//! Defines the shared publish/subscribe abstraction addressed by topic name.

use crate::errors::TransportError;
use crate::subscriber::{Subscription, TopicTable};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for a topic-addressed publish/subscribe medium.
///
/// Shared by every open gateway, and the medium underneath the in-memory
/// per-recipient client factory.
#[async_trait]
pub trait PubSubProvider: Send + Sync {
    /// Publish raw bytes to a topic.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the message. Zero
    /// subscribers is not an error; delivery is not guaranteed.
    async fn publish(&self, topic: &str, data: Vec<u8>) -> Result<usize, TransportError> {
        Self::check_topic(topic)?;

        self.messages_published.fetch_add(1, Ordering::Relaxed);

        let sender = self.topics.read().get(topic).map(|entry| entry.sender.clone());
        match sender.map(|sender| sender.send(data)) {
            Some(Ok(receiver_count)) => {
                debug!(topic = topic, receivers = receiver_count, "Message published");
                Ok(receiver_count)
            }
            Some(Err(_)) | None => {
                warn!(topic = topic, "Message dropped (no subscribers)");
                Ok(0)
            }
        }
    }

    fn subscribe(&self, topic: &str) -> Result<Subscription, TransportError> {
        Self::check_topic(topic)?;

        let receiver = {
            let mut topics = self.topics.write();
            let entry = topics.entry(topic.to_string()).or_insert_with(|| Topic {
                sender: broadcast::channel(self.capacity).0,
                subscribers: 0,
            });
            entry.subscribers += 1;
            entry.sender.subscribe()
        };

        debug!(topic = topic, "New subscription created");

        Ok(Subscription::new(
            receiver,
            topic.to_string(),
            self.topics.clone(),
        ))
    }
}
