//! # Certificate Authority Subsystem (IM-01)
//!
//! Signs and verifies identity claims bound to a message correlation id.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Canonical payload, claims and errors, no I/O
//! - **Ports Layer** (`ports/`): `CertificateIssuer` API plus the `Signer` and
//!   `DirectoryLookup` capabilities it consumes
//! - **Adapters Layer** (`adapters/`): In-memory directory and key-pair signer
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Security Notes
//!
//! - **Correlation Binding**: The proof covers `(claim, correlation_id)`, so a
//!   captured certificate fails verification under any other correlation id.
//! - **Context Binding**: The proof also covers the channel and recipient it
//!   was made for, so a certificate captured on one inbound channel or
//!   gateway topic is worthless on any other.
//! - **Domain Separation**: The signed payload is tagged, so certificate
//!   signatures cannot be confused with other signatures made by the same key.
//! - **Stateless Verification**: `verify` never mutates state and may be
//!   repeated. Replay protection belongs to the messenger layer.
//! - **Caller-Owned Keys**: The authority never persists key material; it
//!   only invokes the supplied `Signer`.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{InMemoryDirectory, KeyPairSigner};
pub use domain::claim::IdentityClaim;
pub use domain::context::CertificateContext;
pub use domain::errors::CertificateError;
pub use domain::payload::{canonical_payload, CERTIFICATE_DOMAIN_TAG};
pub use ports::inbound::CertificateIssuer;
pub use ports::outbound::{DirectoryError, DirectoryLookup, Signer, SignerError};
pub use service::CertificateAuthority;
