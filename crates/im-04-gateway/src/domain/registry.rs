//! # Handler Registry
//!
//! Fixed, ordered set of handlers, validated once at construction.

use crate::domain::errors::RegistryError;
use crate::domain::handler::{BasicProtocolHandler, ProtocolHandler};
use im_03_protocol_messenger::payments_protocol;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Immutable protocol-name to handler mapping.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn ProtocolHandler>>,
}

impl HandlerRegistry {
    /// Build a registry from an ordered seed.
    ///
    /// # Errors
    /// * `RegistryError::EmptyName` - A handler has a blank name
    /// * `RegistryError::DuplicateName` - Two handlers share a name
    pub fn new(handlers: Vec<Arc<dyn ProtocolHandler>>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(handlers.len());
        for handler in &handlers {
            let name = handler.name();
            if name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if !seen.insert(name.to_string()) {
                return Err(RegistryError::DuplicateName(name.to_string()));
            }
        }
        Ok(Self { handlers })
    }

    /// `[BASIC, PAYMENTS]`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let basic: Arc<dyn ProtocolHandler> = Arc::new(BasicProtocolHandler);
        let payments: Arc<dyn ProtocolHandler> = Arc::new(payments_protocol());
        Self {
            handlers: vec![basic, payments],
        }
    }

    /// Handler registered under exactly `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ProtocolHandler>> {
        self.handlers
            .iter()
            .find(|handler| handler.name() == name)
            .cloned()
    }

    /// Registered names in seed order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    /// Number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}
