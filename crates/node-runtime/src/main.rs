//! # Identity Messaging Node
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment and validate it
//! 2. Install the log subscriber
//! 3. Build the messaging container
//! 4. Provision two identities and run the loopback self-check
//!
//! Exits non-zero if any step fails.

use anyhow::{Context, Result};
use node_runtime::{init_logging, run_self_check, MessagingNode, NodeConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env();
    config.validate().context("Invalid configuration")?;

    init_logging(&config)?;

    info!("===========================================");
    info!("  Identity Messaging Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let node = MessagingNode::new(config);
    let sender = node
        .provision("self-check-sender")
        .context("Failed to provision sender identity")?;
    let receiver = node
        .provision("self-check-receiver")
        .context("Failed to provision receiver identity")?;

    run_self_check(&node, sender, receiver)
        .await
        .context("Loopback self-check failed")?;

    info!(
        messages_published = node.provider().messages_published(),
        "Self-check passed"
    );
    Ok(())
}
