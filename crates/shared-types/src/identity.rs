//! # Identity
//!
//! A messaging participant is addressed by `subdomain@domain`, for example
//! `foo@wallet.ns`. Identities are parsed once into canonical form (trimmed,
//! ASCII lowercase) and are immutable afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum subdomain length in characters.
pub const MAX_SUBDOMAIN_LEN: usize = 64;

/// Maximum domain length in characters.
pub const MAX_DOMAIN_LEN: usize = 253;

/// Errors from parsing an identity string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No `@` between subdomain and domain.
    #[error("Identity {0:?} is missing the '@' separator")]
    MissingSeparator(String),

    /// Subdomain is empty, too long, or contains illegal characters.
    #[error("Invalid subdomain {0:?}: must start with a letter and contain only letters, digits, '-' or '_'")]
    InvalidSubdomain(String),

    /// Domain is empty, too long, or has an empty/illegal label.
    #[error("Invalid domain {0:?}: expected dot-separated labels of letters, digits, '-' or '_'")]
    InvalidDomain(String),
}

/// Canonical identity of a messaging participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity {
    canonical: String,
    /// Byte offset of the `@` in `canonical`.
    separator: usize,
}

impl Identity {
    /// Parse and canonicalize an identity string.
    ///
    /// # Errors
    ///
    /// Returns an `IdentityError` describing the first component that fails
    /// validation.
    pub fn parse(input: &str) -> Result<Self, IdentityError> {
        let canonical = input.trim().to_ascii_lowercase();

        let Some(separator) = canonical.find('@') else {
            return Err(IdentityError::MissingSeparator(input.to_string()));
        };

        let subdomain = &canonical[..separator];
        let domain = &canonical[separator + 1..];

        if !is_valid_subdomain(subdomain) {
            return Err(IdentityError::InvalidSubdomain(subdomain.to_string()));
        }
        if !is_valid_domain(domain) {
            return Err(IdentityError::InvalidDomain(domain.to_string()));
        }

        Ok(Self {
            canonical,
            separator,
        })
    }

    /// Build an identity from its two components.
    pub fn new(subdomain: &str, domain: &str) -> Result<Self, IdentityError> {
        Self::parse(&format!("{subdomain}@{domain}"))
    }

    /// The part before `@`.
    #[must_use]
    pub fn subdomain(&self) -> &str {
        &self.canonical[..self.separator]
    }

    /// The part after `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.canonical[self.separator + 1..]
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_valid_subdomain(subdomain: &str) -> bool {
    let mut chars = subdomain.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    subdomain.len() <= MAX_SUBDOMAIN_LEN && first.is_ascii_alphabetic() && chars.all(is_label_char)
}

fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain.len() <= MAX_DOMAIN_LEN
        && domain
            .split('.')
            .all(|label| !label.is_empty() && label.chars().all(is_label_char))
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.canonical
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}
