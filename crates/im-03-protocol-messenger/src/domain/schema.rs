//! # Content Schemas
//!
//! Declarative shape checks for `ProtocolMessage.content`.
//!
//! A schema lists fields with a kind and whether they are required. Content
//! must be a JSON object; fields not named by the schema are rejected unless
//! the schema opts in with `allow_unknown_fields`.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Why content failed a validator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// Content is not a JSON object.
    #[error("content must be an object")]
    NotAnObject,

    /// A required field is absent.
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// A field the schema does not declare.
    #[error("unexpected field '{0}'")]
    UnknownField(String),

    /// A field holds a value of the wrong kind.
    #[error("field '{field}' must be {expected}")]
    WrongKind {
        /// Offending field.
        field: String,
        /// Kind the schema requires.
        expected: FieldKind,
    },

    /// A custom validator returned false.
    #[error("content rejected by validator")]
    Rejected,
}

/// The value kinds a schema field can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any string.
    String,
    /// A string with at least one non-whitespace character.
    NonEmptyString,
    /// A non-negative decimal in string form, e.g. `"1"` or `"0.25"`.
    DecimalString,
    /// A UUID in string form.
    Uuid,
    /// Any JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// A JSON object.
    Object,
}

impl FieldKind {
    /// Whether `value` is of this kind.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::String, Value::String(_)) => true,
            (FieldKind::NonEmptyString, Value::String(s)) => !s.trim().is_empty(),
            (FieldKind::DecimalString, Value::String(s)) => is_decimal(s),
            (FieldKind::Uuid, Value::String(s)) => Uuid::parse_str(s).is_ok(),
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::Object, Value::Object(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "a string",
            FieldKind::NonEmptyString => "a non-empty string",
            FieldKind::DecimalString => "a decimal string",
            FieldKind::Uuid => "a UUID string",
            FieldKind::Number => "a number",
            FieldKind::Boolean => "a boolean",
            FieldKind::Object => "an object",
        };
        f.write_str(name)
    }
}

fn is_decimal(s: &str) -> bool {
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('.') {
        Some((whole, fraction)) => digits(whole) && digits(fraction),
        None => digits(s),
    }
}

/// Validates message content for one message type.
pub trait ContentValidator: Send + Sync {
    /// Check `content`, explaining any rejection.
    fn check(&self, content: &Value) -> Result<(), SchemaViolation>;

    /// Whether `content` is acceptable.
    fn validate(&self, content: &Value) -> bool {
        self.check(content).is_ok()
    }
}

impl<F> ContentValidator for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn check(&self, content: &Value) -> Result<(), SchemaViolation> {
        if self(content) {
            Ok(())
        } else {
            Err(SchemaViolation::Rejected)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldRule {
    name: String,
    kind: FieldKind,
    required: bool,
}

/// Declarative object schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSchema {
    fields: Vec<FieldRule>,
    allow_unknown: bool,
}

impl ContentSchema {
    /// An empty schema accepting only `{}`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field.
    #[must_use]
    pub fn required(self, name: &str, kind: FieldKind) -> Self {
        self.field(name, kind, true)
    }

    /// Add an optional field.
    #[must_use]
    pub fn optional(self, name: &str, kind: FieldKind) -> Self {
        self.field(name, kind, false)
    }

    /// Accept fields the schema does not declare.
    #[must_use]
    pub fn allow_unknown_fields(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    fn field(mut self, name: &str, kind: FieldKind, required: bool) -> Self {
        // Last declaration wins.
        self.fields.retain(|rule| rule.name != name);
        self.fields.push(FieldRule {
            name: name.to_string(),
            kind,
            required,
        });
        self
    }

    fn check_object(&self, object: &Map<String, Value>) -> Result<(), SchemaViolation> {
        for rule in &self.fields {
            match object.get(&rule.name) {
                None if rule.required => return Err(SchemaViolation::MissingField(rule.name.clone())),
                None => {}
                Some(value) if !rule.kind.matches(value) => {
                    return Err(SchemaViolation::WrongKind {
                        field: rule.name.clone(),
                        expected: rule.kind,
                    })
                }
                Some(_) => {}
            }
        }

        if !self.allow_unknown {
            if let Some(unknown) = object
                .keys()
                .find(|key| !self.fields.iter().any(|rule| &rule.name == *key))
            {
                return Err(SchemaViolation::UnknownField(unknown.clone()));
            }
        }

        Ok(())
    }
}

impl ContentValidator for ContentSchema {
    fn check(&self, content: &Value) -> Result<(), SchemaViolation> {
        match content {
            Value::Object(object) => self.check_object(object),
            _ => Err(SchemaViolation::NotAnObject),
        }
    }
}
