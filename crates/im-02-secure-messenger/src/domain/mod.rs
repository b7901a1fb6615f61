//! # Domain Layer
//!
//! Messenger configuration and errors.

pub mod config;
pub mod errors;
