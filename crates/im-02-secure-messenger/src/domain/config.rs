//! Messenger configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default replay window in seconds.
pub const DEFAULT_REPLAY_WINDOW_SECS: u64 = 120;

/// Default number of tracked `(claim, correlation_id)` pairs.
pub const DEFAULT_REPLAY_CAPACITY: usize = 100_000;

/// Default tolerance, in seconds, for sender clocks running ahead.
pub const DEFAULT_MAX_CLOCK_SKEW_SECS: u64 = 10;

/// Receive-side settings shared by messengers and authenticated gateways.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessengerConfig {
    /// Reject envelopes whose `(claim, correlation_id)` was already delivered.
    pub replay_protection: bool,

    /// Maximum age of an accepted correlation id; a delivered pair stays
    /// blocked until its id is this old.
    pub replay_window: Duration,

    /// Maximum tracked pairs. Beyond this the oldest is evicted and ids no
    /// newer than it are rejected.
    pub replay_capacity: usize,

    /// How far ahead of the local clock a correlation id may be.
    pub max_clock_skew: Duration,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            replay_protection: true,
            replay_window: Duration::from_secs(DEFAULT_REPLAY_WINDOW_SECS),
            replay_capacity: DEFAULT_REPLAY_CAPACITY,
            max_clock_skew: Duration::from_secs(DEFAULT_MAX_CLOCK_SKEW_SECS),
        }
    }
}

impl MessengerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `IM_REPLAY_PROTECTION`: Enable the replay guard (default: true)
    /// - `IM_REPLAY_WINDOW_SECS`: Replay window in seconds (default: 120)
    /// - `IM_REPLAY_CAPACITY`: Tracked pairs (default: 100000)
    /// - `IM_MAX_CLOCK_SKEW_SECS`: Future clock skew tolerance (default: 10)
    pub fn from_env() -> Self {
        Self {
            replay_protection: env::var("IM_REPLAY_PROTECTION")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            replay_window: Duration::from_secs(
                env::var("IM_REPLAY_WINDOW_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_REPLAY_WINDOW_SECS),
            ),

            replay_capacity: env::var("IM_REPLAY_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REPLAY_CAPACITY),

            max_clock_skew: Duration::from_secs(
                env::var("IM_MAX_CLOCK_SKEW_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_CLOCK_SKEW_SECS),
            ),
        }
    }

    /// Configuration with the replay guard switched off.
    #[must_use]
    pub fn without_replay_protection() -> Self {
        Self {
            replay_protection: false,
            ..Self::default()
        }
    }
}
