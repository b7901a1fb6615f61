//! # Ports Layer
//!
//! - **Inbound (Driving)**: `SecureMessengerApi`, used by the protocol layer
//!   and application code
//! - **Outbound (Driven)**: directory, transport and certificate capabilities

pub mod inbound;
pub mod outbound;
