//! # Protocol Handlers
//!
//! A handler is a named, stateless validator for one protocol.

use im_03_protocol_messenger::ProtocolDefinition;
use shared_types::ProtocolMessage;

/// Name of the permissive built-in handler.
pub const BASIC_PROTOCOL: &str = "BASIC";

/// Named validator for one message protocol.
pub trait ProtocolHandler: Send + Sync {
    /// Registry key. Matched exactly, case-sensitive.
    fn name(&self) -> &str;

    /// Whether `message` is acceptable under this protocol.
    fn validate(&self, message: &ProtocolMessage) -> bool;
}

/// Accepts every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicProtocolHandler;

impl ProtocolHandler for BasicProtocolHandler {
    fn name(&self) -> &str {
        BASIC_PROTOCOL
    }

    fn validate(&self, _message: &ProtocolMessage) -> bool {
        true
    }
}

impl ProtocolHandler for ProtocolDefinition {
    fn name(&self) -> &str {
        ProtocolDefinition::name(self)
    }

    fn validate(&self, message: &ProtocolMessage) -> bool {
        ProtocolDefinition::validate(self, message)
    }
}
