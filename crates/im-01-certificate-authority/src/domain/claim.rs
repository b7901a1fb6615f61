//! # Identity Claim
//!
//! The caller's own identity paired with the capability that signs for it.

use crate::ports::outbound::Signer;
use shared_types::Identity;
use std::fmt;
use std::sync::Arc;

/// Self identity plus its signer.
#[derive(Clone)]
pub struct IdentityClaim {
    identity: Identity,
    signer: Arc<dyn Signer>,
}

impl IdentityClaim {
    /// Pair an identity with the signer for its key.
    pub fn new(identity: Identity, signer: Arc<dyn Signer>) -> Self {
        Self { identity, signer }
    }

    /// The claimed identity.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The signing capability.
    #[must_use]
    pub fn signer(&self) -> &dyn Signer {
        self.signer.as_ref()
    }
}

impl fmt::Debug for IdentityClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityClaim")
            .field("identity", &self.identity)
            .field("public_key", &self.signer.public_key())
            .finish()
    }
}
