//! # Correlation Ids
//!
//! Every outbound message gets a UUID v7 correlation id. The first 48 bits
//! carry the sender's clock in milliseconds since the Unix epoch, and the id
//! is bound into the certificate, so receivers can bound how old a message
//! is without any extra signed field.

use uuid::Uuid;

/// Generate a fresh, time-ordered correlation id.
#[must_use]
pub fn new_correlation_id() -> Uuid {
    Uuid::now_v7()
}

/// Issue time of a v7 correlation id in milliseconds since the Unix epoch.
///
/// Returns `None` for any other UUID version, which carries no usable time.
#[must_use]
pub fn correlation_timestamp_ms(id: &Uuid) -> Option<u64> {
    let bytes = id.as_bytes();
    if bytes[6] >> 4 != 7 {
        return None;
    }
    Some(
        bytes[..6]
            .iter()
            .fold(0u64, |ts, byte| (ts << 8) | u64::from(*byte)),
    )
}
