//! Ed25519 key-pair signer.

use crate::ports::outbound::{Signer, SignerError};
use async_trait::async_trait;
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// `Signer` backed by an in-process Ed25519 key pair.
#[derive(Debug)]
pub struct KeyPairSigner {
    keypair: Ed25519KeyPair,
}

impl KeyPairSigner {
    /// Wrap an existing key pair.
    pub fn new(keypair: Ed25519KeyPair) -> Self {
        Self { keypair }
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self::new(Ed25519KeyPair::generate())
    }

    /// Deterministic key from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::new(Ed25519KeyPair::from_seed(seed))
    }
}

#[async_trait]
impl Signer for KeyPairSigner {
    async fn sign(&self, payload: &[u8]) -> Result<Ed25519Signature, SignerError> {
        Ok(self.keypair.sign(payload))
    }

    fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }
}
