//! # Node Runtime Library
//!
//! Exposes the wiring of the `node-runtime` binary for tests and embedding.
//!
//! ## Modules
//!
//! - `container/` - `NodeConfig` and the `MessagingNode` container
//! - `logging` - Global `tracing` subscriber setup
//! - `self_check` - Loopback delivery check run at startup

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod container;
pub mod logging;
pub mod self_check;

pub use container::{ConfigError, MessagingNode, NodeConfig, NodeError};
pub use logging::init_logging;
pub use self_check::run_self_check;
