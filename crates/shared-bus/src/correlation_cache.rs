//! # Time-Bounded Correlation Cache
//!
//! Replay guard for verified envelopes.
//!
//! ## Security Design
//!
//! - Correlation ids are UUID v7: their issue time is signed along with them
//! - An id issued more than one window ago, or too far in the future, is
//!   rejected before the cache is consulted
//! - A `(claim, correlation_id)` pair inside the window is accepted at most once
//! - Entries expire exactly when their id leaves the window
//! - Capacity is bounded. Evicting the oldest entry raises a floor, and ids
//!   issued at or before the floor are rejected as too old, so eviction
//!   never reopens a pair to replay
//!
//! Only pairs whose certificate already verified are recorded, so an
//! attacker cannot poison the cache with forged claims.

use shared_types::{correlation_timestamp_ms, Identity};
use std::collections::{BTreeSet, HashSet};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Errors from correlation cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The pair was already delivered inside the window.
    #[error("Correlation id {correlation_id} from {claim} has already been delivered (replay)")]
    Replayed {
        /// Sender claim of the replayed envelope.
        claim: Identity,
        /// Reused correlation id.
        correlation_id: Uuid,
    },

    /// The correlation id is not a UUID v7 and carries no issue time.
    #[error("Correlation id {correlation_id} from {claim} carries no issue time")]
    Untimestamped {
        /// Sender claim.
        claim: Identity,
        /// Offending correlation id.
        correlation_id: Uuid,
    },

    /// The correlation id was issued before the window.
    #[error("Correlation id {correlation_id} from {claim} issued at {issued_at_ms} ms is too old (threshold: {threshold_ms} ms)")]
    TooOld {
        /// Sender claim.
        claim: Identity,
        /// Offending correlation id.
        correlation_id: Uuid,
        /// Issue time read from the id.
        issued_at_ms: u64,
        /// Ids issued at or before this are rejected.
        threshold_ms: u64,
    },

    /// The correlation id was issued too far in the future.
    #[error("Correlation id {correlation_id} from {claim} issued at {issued_at_ms} ms is in the future (threshold: {threshold_ms} ms)")]
    FromFuture {
        /// Sender claim.
        claim: Identity,
        /// Offending correlation id.
        correlation_id: Uuid,
        /// Issue time read from the id.
        issued_at_ms: u64,
        /// Latest accepted issue time.
        threshold_ms: u64,
    },
}

impl ReplayError {
    /// Whether the pair itself was seen before, as opposed to failing the
    /// time checks.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ReplayError::Replayed { .. })
    }
}

type Key = (Identity, Uuid);

/// Bounded set of delivered `(claim, correlation_id)` pairs whose ids are
/// still inside the window.
pub struct CorrelationCache {
    /// Pairs currently blocked.
    seen: HashSet<Key>,

    /// The same pairs ordered by issue time, oldest first.
    by_issue_time: BTreeSet<(u64, Key)>,

    /// Highest issue time evicted for capacity.
    floor_ms: Option<u64>,

    /// How old an id may be.
    window: Duration,

    /// How far ahead of the local clock an id may be.
    max_future_skew: Duration,

    /// Maximum tracked pairs.
    capacity: usize,
}

impl CorrelationCache {
    /// Default replay window.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(120);

    /// Default maximum tracked pairs.
    pub const DEFAULT_CAPACITY: usize = 100_000;

    /// Default tolerance for sender clocks running ahead.
    pub const DEFAULT_MAX_FUTURE_SKEW: Duration = Duration::from_secs(10);

    /// Create a cache with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Self::DEFAULT_WINDOW, Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom window and capacity (minimum one entry).
    #[must_use]
    pub fn with_config(window: Duration, capacity: usize) -> Self {
        Self {
            seen: HashSet::new(),
            by_issue_time: BTreeSet::new(),
            floor_ms: None,
            window,
            max_future_skew: Self::DEFAULT_MAX_FUTURE_SKEW,
            capacity: capacity.max(1),
        }
    }

    /// Replace the future skew tolerance.
    #[must_use]
    pub fn with_max_future_skew(mut self, skew: Duration) -> Self {
        self.max_future_skew = skew;
        self
    }

    /// Reject the pair if its id is outside the window or already seen,
    /// otherwise record it.
    ///
    /// # Errors
    ///
    /// - `ReplayError::Untimestamped` - The id is not a UUID v7
    /// - `ReplayError::TooOld` - Issued a window or more ago, or at or
    ///   before the eviction floor
    /// - `ReplayError::FromFuture` - Issued beyond the skew tolerance
    /// - `ReplayError::Replayed` - The pair was recorded inside the window
    pub fn check_and_record(&mut self, claim: &Identity, correlation_id: Uuid) -> Result<(), ReplayError> {
        self.check_and_record_at(claim, correlation_id, current_time_ms())
    }

    /// As `check_and_record`, with an explicit clock reading in milliseconds
    /// since the Unix epoch.
    ///
    /// # Errors
    ///
    /// As `check_and_record`.
    pub fn check_and_record_at(
        &mut self,
        claim: &Identity,
        correlation_id: Uuid,
        now_ms: u64,
    ) -> Result<(), ReplayError> {
        let issued_at_ms =
            correlation_timestamp_ms(&correlation_id).ok_or_else(|| ReplayError::Untimestamped {
                claim: claim.clone(),
                correlation_id,
            })?;

        let oldest_rejected = now_ms.saturating_sub(duration_ms(self.window));
        self.expire(oldest_rejected);

        // Time checks come before the lookup; they bound everything the
        // cache must hold.
        let threshold_ms = self.floor_ms.map_or(oldest_rejected, |floor| floor.max(oldest_rejected));
        if issued_at_ms <= threshold_ms {
            return Err(ReplayError::TooOld {
                claim: claim.clone(),
                correlation_id,
                issued_at_ms,
                threshold_ms,
            });
        }

        let newest_accepted = now_ms.saturating_add(duration_ms(self.max_future_skew));
        if issued_at_ms > newest_accepted {
            return Err(ReplayError::FromFuture {
                claim: claim.clone(),
                correlation_id,
                issued_at_ms,
                threshold_ms: newest_accepted,
            });
        }

        let key = (claim.clone(), correlation_id);
        if self.seen.contains(&key) {
            return Err(ReplayError::Replayed {
                claim: claim.clone(),
                correlation_id,
            });
        }

        while self.seen.len() >= self.capacity {
            let Some((oldest_ms, _)) = self.by_issue_time.first() else {
                break;
            };
            let oldest_ms = *oldest_ms;
            if issued_at_ms <= oldest_ms {
                return Err(ReplayError::TooOld {
                    claim: claim.clone(),
                    correlation_id,
                    issued_at_ms,
                    threshold_ms: oldest_ms,
                });
            }
            if let Some((evicted_ms, evicted)) = self.by_issue_time.pop_first() {
                self.seen.remove(&evicted);
                self.floor_ms = Some(self.floor_ms.map_or(evicted_ms, |floor| floor.max(evicted_ms)));
            }
        }

        self.seen.insert(key.clone());
        self.by_issue_time.insert((issued_at_ms, key));
        Ok(())
    }

    /// Whether the pair is currently blocked.
    #[must_use]
    pub fn contains(&self, claim: &Identity, correlation_id: Uuid) -> bool {
        self.seen.contains(&(claim.clone(), correlation_id))
    }

    /// Number of tracked pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no pairs are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Configured window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Drop every entry issued at or before `oldest_rejected`; the time
    /// check already rejects those ids.
    fn expire(&mut self, oldest_rejected: u64) {
        while let Some((issued_at_ms, _)) = self.by_issue_time.first() {
            if *issued_at_ms > oldest_rejected {
                break;
            }
            if let Some((_, key)) = self.by_issue_time.pop_first() {
                self.seen.remove(&key);
            }
        }
    }
}

impl Default for CorrelationCache {
    fn default() -> Self {
        Self::new()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn current_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(duration_ms)
        .unwrap_or(0)
}
