//! # Domain Layer
//!
//! Pure certificate logic with no I/O dependencies.

pub mod claim;
pub mod context;
pub mod errors;
pub mod payload;
