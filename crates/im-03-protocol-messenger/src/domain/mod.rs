//! # Domain Layer
//!
//! Content schemas, protocol definitions and the built-in payment protocol.
//! Pure validation logic, no I/O.

pub mod definition;
pub mod errors;
pub mod payments;
pub mod schema;
