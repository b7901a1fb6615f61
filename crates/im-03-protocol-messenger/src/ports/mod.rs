//! # Ports Layer
//!
//! - **Inbound (Driving)**: `ProtocolMessengerApi`
//! - **Outbound (Driven)**: the wrapped `SecureMessengerApi` (IM-02)

pub mod inbound;
