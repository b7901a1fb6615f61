//! # Error Taxonomy
//!
//! Every layer defines its own error enum; each one maps onto this shared
//! classification through a `kind()` method so callers can branch on the
//! category without matching every layer's variants.

use std::fmt;

/// Cross-layer error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The directory has no key for a claimed identity. Recoverable, e.g.
    /// by retrying after directory propagation.
    UnknownIdentity,
    /// Signature, correlation id or replay check failed. A security event,
    /// never a transient fault.
    CertificateInvalid,
    /// Content fails shape validation for its declared type.
    MalformedProtocolMessage,
    /// Gateway open requested for an unregistered protocol name.
    UnsupportedProtocol,
    /// The publish/subscribe transport failed. Passed through unchanged.
    Transport,
    /// The directory lookup itself failed. Passed through unchanged.
    Directory,
    /// The signing capability failed.
    Signing,
    /// Local misconfiguration detected before any I/O.
    Configuration,
}

impl ErrorKind {
    /// Whether this kind should be treated as a security event.
    #[must_use]
    pub fn is_security_event(self) -> bool {
        matches!(self, ErrorKind::CertificateInvalid)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnknownIdentity => "UnknownIdentity",
            ErrorKind::CertificateInvalid => "CertificateInvalid",
            ErrorKind::MalformedProtocolMessage => "MalformedProtocolMessage",
            ErrorKind::UnsupportedProtocol => "UnsupportedProtocol",
            ErrorKind::Transport => "Transport",
            ErrorKind::Directory => "Directory",
            ErrorKind::Signing => "Signing",
            ErrorKind::Configuration => "Configuration",
        };
        f.write_str(name)
    }
}
