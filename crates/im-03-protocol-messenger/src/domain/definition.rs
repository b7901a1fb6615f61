//! # Protocol Definitions
//!
//! A protocol is a fixed mapping from message type to content validator.
//! Definitions are validated eagerly when built and immutable afterwards.

use crate::domain::errors::{DefinitionError, MalformedReason, ProtocolError};
use crate::domain::schema::ContentValidator;
use shared_types::ProtocolMessage;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Named, immutable set of message types and their validators.
#[derive(Clone)]
pub struct ProtocolDefinition {
    name: String,
    validators: HashMap<String, Arc<dyn ContentValidator>>,
}

impl ProtocolDefinition {
    /// Start building a protocol called `name`.
    #[must_use]
    pub fn builder(name: &str) -> ProtocolDefinitionBuilder {
        ProtocolDefinitionBuilder {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// Single-type protocol from compile-time names, which cannot collide.
    pub(crate) fn single(
        name: &'static str,
        message_type: &'static str,
        validator: impl ContentValidator + 'static,
    ) -> Self {
        let validator: Arc<dyn ContentValidator> = Arc::new(validator);
        Self {
            name: name.to_string(),
            validators: HashMap::from([(message_type.to_string(), validator)]),
        }
    }

    /// Protocol name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared message types, sorted.
    #[must_use]
    pub fn message_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Validator for `message_type`, if declared.
    #[must_use]
    pub fn validator(&self, message_type: &str) -> Option<&dyn ContentValidator> {
        self.validators.get(message_type).map(|v| v.as_ref())
    }

    /// Check a message against its type's validator.
    ///
    /// # Errors
    /// * `ProtocolError::Malformed` - Unknown type or rejected content
    pub fn check(&self, message: &ProtocolMessage) -> Result<(), ProtocolError> {
        let validator = self
            .validator(&message.message_type)
            .ok_or_else(|| self.malformed(MalformedReason::UnknownType(message.message_type.clone())))?;

        validator.check(&message.content).map_err(|violation| {
            self.malformed(MalformedReason::InvalidContent {
                message_type: message.message_type.clone(),
                violation,
            })
        })
    }

    /// Whether the message is well-formed for this protocol.
    #[must_use]
    pub fn validate(&self, message: &ProtocolMessage) -> bool {
        self.check(message).is_ok()
    }

    pub(crate) fn malformed(&self, reason: MalformedReason) -> ProtocolError {
        ProtocolError::Malformed {
            protocol: self.name.clone(),
            reason,
        }
    }
}

impl fmt::Debug for ProtocolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolDefinition")
            .field("name", &self.name)
            .field("message_types", &self.message_types())
            .finish()
    }
}

/// Builder for `ProtocolDefinition`.
pub struct ProtocolDefinitionBuilder {
    name: String,
    entries: Vec<(String, Arc<dyn ContentValidator>)>,
}

impl ProtocolDefinitionBuilder {
    /// Declare a message type and its validator.
    #[must_use]
    pub fn message(mut self, message_type: &str, validator: impl ContentValidator + 'static) -> Self {
        self.entries
            .push((message_type.to_string(), Arc::new(validator)));
        self
    }

    /// Finish the definition.
    ///
    /// # Errors
    /// * `DefinitionError::EmptyName` - Blank protocol name
    /// * `DefinitionError::EmptyMessageType` - Blank message type
    /// * `DefinitionError::DuplicateMessageType` - Type declared twice
    /// * `DefinitionError::NoMessageTypes` - Nothing declared
    pub fn build(self) -> Result<ProtocolDefinition, DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::EmptyName);
        }
        if self.entries.is_empty() {
            return Err(DefinitionError::NoMessageTypes {
                protocol: self.name,
            });
        }

        let mut validators = HashMap::with_capacity(self.entries.len());
        for (message_type, validator) in self.entries {
            if message_type.trim().is_empty() {
                return Err(DefinitionError::EmptyMessageType {
                    protocol: self.name,
                });
            }
            if validators.contains_key(&message_type) {
                return Err(DefinitionError::DuplicateMessageType {
                    protocol: self.name,
                    message_type,
                });
            }
            validators.insert(message_type, validator);
        }

        Ok(ProtocolDefinition {
            name: self.name,
            validators,
        })
    }
}
