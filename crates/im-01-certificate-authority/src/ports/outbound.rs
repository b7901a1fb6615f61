//! # Outbound Ports (Driven Ports / SPI)
//!
//! Capabilities supplied by the caller. The authority consumes them but
//! never implements key storage or directory resolution itself.

use async_trait::async_trait;
use shared_crypto::{Ed25519PublicKey, Ed25519Signature};
use shared_types::Identity;
use thiserror::Error;

/// Error from a signing capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// The key is not reachable (locked wallet, disconnected device).
    #[error("Signer unavailable: {0}")]
    Unavailable(String),

    /// The signer refused to sign the payload.
    #[error("Signing rejected: {0}")]
    Rejected(String),
}

/// Error from the directory itself, as opposed to a missing record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The backing directory could not be reached.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// The lookup did not complete in time.
    #[error("Directory lookup for {identity} timed out")]
    Timeout {
        /// Identity being resolved.
        identity: Identity,
    },
}

/// Signing capability for one identity.
///
/// May be invoked concurrently by several in-flight sends; implementations
/// must be safe for concurrent use or serialize internally.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign `payload`.
    ///
    /// # Errors
    /// * `SignerError::Unavailable` - The key cannot be reached
    /// * `SignerError::Rejected` - The signer declined the request
    async fn sign(&self, payload: &[u8]) -> Result<Ed25519Signature, SignerError>;

    /// The public half of the signing key.
    fn public_key(&self) -> Ed25519PublicKey;
}

/// Read-only resolution of identities to their current public key.
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// Resolve `identity`.
    ///
    /// # Returns
    /// - `Ok(Some(key))` - The key currently registered for the identity
    /// - `Ok(None)` - The directory has no record
    /// - `Err(_)` - The lookup itself failed
    async fn resolve(&self, identity: &Identity) -> Result<Option<Ed25519PublicKey>, DirectoryError>;
}
