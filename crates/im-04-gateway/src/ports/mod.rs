//! # Ports Layer
//!
//! - **Inbound (Driving)**: `GatewayApi`
//! - **Outbound (Driven)**: shared topic provider, directory and certificate
//!   issuer (authenticated mode only)

pub mod inbound;
pub mod outbound;
