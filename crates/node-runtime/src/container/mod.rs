//! # Messaging Container
//!
//! Configuration plus the `MessagingNode` holding the shared infrastructure
//! every messenger and gateway on this node is built from.
//!
//! - One identity directory, shared by senders and receivers
//! - One topic provider; per-recipient clients are a codec over it
//! - One handler registry for gateway repositories

pub mod config;
pub mod node;

pub use config::{ConfigError, NodeConfig};
pub use node::{MessagingNode, NodeError};
