//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that messengers and gateways use
//! - **Outbound (Driven)**: Capabilities this subsystem needs

pub mod inbound;
pub mod outbound;
