//! Adapters layer for the Certificate Authority.
//!
//! In-memory implementations of the outbound capabilities.

pub mod directory;
pub mod signer;

pub use directory::InMemoryDirectory;
pub use signer::KeyPairSigner;
