//! # Shared Types Crate
//!
//! This crate contains the data model that every layer of the messaging
//! stack agrees on: identities, certificates, the `Envelope` placed on the
//! transport, and the `ProtocolMessage` carried inside it.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-layer types are defined here.
//! - **Certificate Authority**: The envelope's `certificate.claim` is the sole
//!   statement of who sent a message, and it only counts once verified.
//! - **Canonical Identities**: `Identity` values are always in canonical
//!   form, so equality is plain string equality.

pub mod correlation;
pub mod envelope;
pub mod errors;
pub mod identity;
pub mod protocol;

pub use correlation::{correlation_timestamp_ms, new_correlation_id};
pub use envelope::{Certificate, Envelope};
pub use errors::ErrorKind;
pub use identity::{Identity, IdentityError};
pub use protocol::ProtocolMessage;
