//! # Node Configuration
//!
//! Runtime parameters for logging, the topic bus and the receive-side
//! replay guard.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `IM_LOG_LEVEL` / `RUST_LOG` | `info` | `EnvFilter` directive |
//! | `IM_JSON_LOGS` | `false` | JSON formatted log lines |
//! | `IM_DOMAIN` | `wallet.ns` | Domain of provisioned identities |
//! | `IM_CHANNEL_CAPACITY` | `1000` | Messages buffered per topic |
//! | `IM_REPLAY_PROTECTION` | `true` | Replay guard on/off |
//! | `IM_REPLAY_WINDOW_SECS` | `120` | Replay window |
//! | `IM_REPLAY_CAPACITY` | `100000` | Tracked `(claim, correlation_id)` pairs |
//! | `IM_MAX_CLOCK_SKEW_SECS` | `10` | Accepted future skew of correlation ids |

use im_02_secure_messenger::MessengerConfig;
use shared_bus::{BusConfig, DEFAULT_CHANNEL_CAPACITY};
use shared_types::{Identity, IdentityError};
use std::env;
use thiserror::Error;

/// Domain used when `IM_DOMAIN` is not set.
pub const DEFAULT_DOMAIN: &str = "wallet.ns";

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// `EnvFilter` directive for the log subscriber.
    pub log_level: String,
    /// Emit JSON log lines instead of the human readable format.
    pub json_logs: bool,
    /// Domain part of every identity this node provisions.
    pub domain: String,
    /// Topic bus settings.
    pub bus: BusConfig,
    /// Replay guard settings for messengers and authenticated gateways.
    pub messenger: MessengerConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            domain: DEFAULT_DOMAIN.to_string(),
            bus: BusConfig::default(),
            messenger: MessengerConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("IM_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("IM_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),

            domain: env::var("IM_DOMAIN").unwrap_or_else(|_| DEFAULT_DOMAIN.to_string()),

            bus: BusConfig {
                channel_capacity: env::var("IM_CHANNEL_CAPACITY")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_CHANNEL_CAPACITY),
            },

            messenger: MessengerConfig::from_env(),
        }
    }

    /// Reject settings the node cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus.channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        if self.messenger.replay_protection {
            if self.messenger.replay_capacity == 0 {
                return Err(ConfigError::ZeroReplayCapacity);
            }
            if self.messenger.replay_window.is_zero() {
                return Err(ConfigError::ZeroReplayWindow);
            }
        }
        // A domain is valid if some identity can be formed with it.
        Identity::new("node", &self.domain).map_err(|source| ConfigError::InvalidDomain {
            domain: self.domain.clone(),
            source,
        })?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The bus cannot buffer a single message.
    #[error("IM_CHANNEL_CAPACITY must be greater than zero")]
    ZeroChannelCapacity,

    /// The replay guard cannot track a single pair.
    #[error("IM_REPLAY_CAPACITY must be greater than zero while replay protection is on")]
    ZeroReplayCapacity,

    /// The replay guard would forget pairs immediately.
    #[error("IM_REPLAY_WINDOW_SECS must be greater than zero while replay protection is on")]
    ZeroReplayWindow,

    /// `IM_DOMAIN` cannot be used in an identity.
    #[error("Invalid IM_DOMAIN {domain:?}: {source}")]
    InvalidDomain {
        domain: String,
        #[source]
        source: IdentityError,
    },
}
