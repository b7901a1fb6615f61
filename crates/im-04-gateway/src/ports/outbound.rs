//! # Outbound Ports (Driven Ports / SPI)
//!
//! | Port | Provided by | Mode |
//! |------|-------------|------|
//! | `PubSubProvider` | shared topic transport (shared-bus) | all |
//! | `DirectoryLookup` | identity directory (IM-01 port) | authenticated |
//! | `CertificateIssuer` | certificate authority (IM-01) | authenticated |

pub use im_01_certificate_authority::{CertificateIssuer, DirectoryLookup, IdentityClaim};
pub use shared_bus::PubSubProvider;
