//! # Shared Crypto - Identity Key Material
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Certificate proofs |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - Secret seeds leave the key pair only inside `Zeroizing` buffers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
