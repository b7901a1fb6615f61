//! # Outbound Ports (Driven Ports / SPI)
//!
//! Capabilities the messenger is constructed with. All are injected; none
//! are looked up from global state.
//!
//! | Port | Provided by |
//! |------|-------------|
//! | `DirectoryLookup` | identity directory (IM-01 port) |
//! | `CertificateIssuer` | certificate authority (IM-01) |
//! | `PubSubClientFactory` | per-recipient transport (shared-bus) |

pub use im_01_certificate_authority::{CertificateIssuer, DirectoryLookup, IdentityClaim};
pub use shared_bus::{PubSubClient, PubSubClientFactory};
