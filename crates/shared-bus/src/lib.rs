//! # Shared Bus - Publish/Subscribe Transports
//!
//! The messaging stack never talks to a network directly; it publishes to
//! and subscribes on one of two transport shapes defined here.
//!
//! ## Transport Shapes
//!
//! ```text
//!  Per-recipient channels                 Shared topics
//!  (secure messenger)                     (gateways)
//!
//!  client_for(bar) ──publish(Envelope)─┐   publish("gateway/PAYMENTS/bar", bytes)
//!                                      ▼               │
//!                             inbound/bar@wallet.ns    ▼
//!                                      │       ┌──────────────┐
//!  client_for(bar) ──subscribe()◄──────┘       │  Topic Bus   │──► subscribe(topic)
//!                                              └──────────────┘
//! ```
//!
//! Both shapes run on the same `InMemoryPubSubProvider`: a per-recipient
//! client is a thin codec over the identity's inbound topic.
//!
//! ## Security
//!
//! - **No trust in the transport**: everything read from a subscription is
//!   untrusted until the layer above verifies it.
//! - **Correlation Cache:** Bounded, time-windowed replay guard for
//!   `(claim, correlation_id)` pairs that already passed verification.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod client;
pub mod correlation_cache;
pub mod errors;
pub mod provider;
pub mod subscriber;

// Re-export main types
pub use client::{
    inbound_channel, EnvelopeSubscription, InMemoryPubSubClient, InMemoryPubSubClientFactory,
    PubSubClient, PubSubClientFactory,
};
pub use correlation_cache::{CorrelationCache, ReplayError};
pub use errors::TransportError;
pub use provider::{BusConfig, InMemoryPubSubProvider, PubSubProvider};
pub use subscriber::Subscription;

/// Maximum messages to buffer per topic before slow subscribers lag.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Prefix of every identity's inbound channel.
pub const INBOUND_TOPIC_PREFIX: &str = "inbound/";
