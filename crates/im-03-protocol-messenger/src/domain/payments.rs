//! # Payment Protocol
//!
//! Built-in `PAYMENTS` protocol. A `PAYMENT_REQUEST` asks the recipient to
//! pay `amount` of asset `assetId` to `toAddress`.
//!
//! ```json
//! {
//!   "type": "PAYMENT_REQUEST",
//!   "content": {
//!     "amount": "1",
//!     "assetId": "7c3baa3c-f5e8-490a-88a1-e0a052b7caa4",
//!     "toAddress": "randomAddress"
//!   }
//! }
//! ```

use crate::domain::definition::ProtocolDefinition;
use crate::domain::schema::{ContentSchema, FieldKind};

/// Protocol name.
pub const PAYMENTS_PROTOCOL: &str = "PAYMENTS";

/// Payment request message type.
pub const PAYMENT_REQUEST: &str = "PAYMENT_REQUEST";

/// Content schema of `PAYMENT_REQUEST`.
#[must_use]
pub fn payment_request_schema() -> ContentSchema {
    ContentSchema::new()
        .required("amount", FieldKind::DecimalString)
        .required("assetId", FieldKind::Uuid)
        .required("toAddress", FieldKind::NonEmptyString)
        .optional("tag", FieldKind::String)
}

/// The `PAYMENTS` protocol definition.
#[must_use]
pub fn payments_protocol() -> ProtocolDefinition {
    ProtocolDefinition::single(PAYMENTS_PROTOCOL, PAYMENT_REQUEST, payment_request_schema())
}
