//! # Protocol Gateway Subsystem (IM-04)
//!
//! Opens one gateway per protocol over a shared topic provider. Each
//! gateway validates outbound messages with its protocol handler before
//! publishing, and validates inbound messages before delivery.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): handlers, the handler registry, the
//!   `GatewayMessage` wire format and errors
//! - **Ports Layer** (`ports/`): `GatewayApi` plus the provider, directory
//!   and issuer capabilities
//! - **Service Layer** (`service.rs`): `GatewayRepository` and `Gateway`
//!
//! ## Modes
//!
//! - **raw**: no certificates; the sender is reported as `None`.
//! - **authenticated**: outbound messages carry a certificate for their
//!   correlation id; inbound messages are verified and replay checked
//!   before the handler runs, and the verified claim is reported.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::errors::{GatewayError, RegistryError};
pub use domain::handler::{BasicProtocolHandler, ProtocolHandler, BASIC_PROTOCOL};
pub use domain::registry::HandlerRegistry;
pub use domain::wire::{gateway_topic, GatewayMessage, GATEWAY_TOPIC_PREFIX};
pub use ports::inbound::{GatewayApi, GatewayErrorCallback, GatewayMessageCallback};
pub use service::{Gateway, GatewayConfig, GatewayRepository};
