//! In-memory identity directory.

use crate::ports::outbound::{DirectoryError, DirectoryLookup};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_crypto::Ed25519PublicKey;
use shared_types::Identity;
use std::collections::HashMap;
use tracing::debug;

/// Directory held in process memory.
///
/// Re-registering an identity rotates its key; certificates made with the
/// previous key stop verifying immediately.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    records: RwLock<HashMap<Identity, Ed25519PublicKey>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or rotate the key for `identity`, returning the previous one.
    pub fn register(&self, identity: Identity, key: Ed25519PublicKey) -> Option<Ed25519PublicKey> {
        debug!(identity = %identity, key = %key, "Directory record registered");
        self.records.write().insert(identity, key)
    }

    /// Remove the record for `identity`.
    pub fn remove(&self, identity: &Identity) -> Option<Ed25519PublicKey> {
        self.records.write().remove(identity)
    }

    /// Whether `identity` has a record.
    #[must_use]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.records.read().contains_key(identity)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl DirectoryLookup for InMemoryDirectory {
    async fn resolve(&self, identity: &Identity) -> Result<Option<Ed25519PublicKey>, DirectoryError> {
        Ok(self.records.read().get(identity).copied())
    }
}
