//! # Protocol Validation Subsystem (IM-03)
//!
//! Typed messages over the secure identity messenger.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): content schemas, protocol definitions,
//!   the built-in `PAYMENTS` protocol and errors
//! - **Ports Layer** (`ports/`): `ProtocolMessengerApi`
//! - **Service Layer** (`service.rs`): `ProtocolMessenger`, wrapping any
//!   `SecureMessengerApi`
//!
//! ## Validation Rules
//!
//! - Outbound messages are checked before the wrapped messenger is called;
//!   a malformed message causes no transport I/O.
//! - Inbound payloads are decoded and re-checked after authentication; a
//!   payload that fails goes to `on_error`, never to `on_message`.
//! - Message types are matched exactly (case-sensitive).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::definition::{ProtocolDefinition, ProtocolDefinitionBuilder};
pub use domain::errors::{DefinitionError, MalformedReason, ProtocolError};
pub use domain::payments::{payment_request_schema, payments_protocol, PAYMENTS_PROTOCOL, PAYMENT_REQUEST};
pub use domain::schema::{ContentSchema, ContentValidator, FieldKind, SchemaViolation};
pub use ports::inbound::{ProtocolErrorCallback, ProtocolMessageCallback, ProtocolMessengerApi};
pub use service::ProtocolMessenger;
