//! # Secure Identity Messenger Subsystem (IM-02)
//!
//! Authenticated point-to-point send/receive over an untrusted transport.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Configuration and errors
//! - **Ports Layer** (`ports/`): `SecureMessengerApi` plus injected capabilities
//! - **Verifier** (`verifier.rs`): Receive-side gate, also used by
//!   authenticated gateways
//! - **Service Layer** (`service.rs`): `SecureIdentityMessenger`
//!
//! ## Security Notes
//!
//! - A message reaches `on_message` only if its certificate verifies against
//!   the directory's current key for the claim, for the envelope's own
//!   correlation id and for the receiver's own inbound channel.
//! - Every rejection goes to `on_error`; nothing is thrown from `listen`
//!   once the subscription exists.
//! - Correlation ids are UUID v7. Ids issued outside the replay window are
//!   rejected, and verified `(claim, correlation_id)` pairs inside it are
//!   accepted once.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod ports;
pub mod service;
pub mod verifier;

// Re-export public API
pub use domain::config::MessengerConfig;
pub use domain::errors::MessengerError;
pub use ports::inbound::{ErrorCallback, MessageCallback, SecureMessengerApi};
pub use service::SecureIdentityMessenger;
pub use verifier::EnvelopeVerifier;
