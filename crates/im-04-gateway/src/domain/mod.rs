//! # Domain Layer
//!
//! Handlers, the handler registry, the wire format and errors.

pub mod errors;
pub mod handler;
pub mod registry;
pub mod wire;
