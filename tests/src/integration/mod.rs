//! # Integration Tests
//!
//! Cross-crate flows from provisioning through delivery.
//!
//! - `messaging` - Secure messenger and payment protocol messenger
//! - `gateway` - Gateway repositories in raw and authenticated mode
//! - `node` - The runtime container and its self-check

pub mod gateway;
pub mod node;
