//! The two error kinds of the library.
//!
//! [`SchemaError`] is fatal and raised only while compiling a schema;
//! [`ValidationMessage`] is non-fatal and streamed to a [`Reporter`] while
//! validating an instance. The validate path never raises `SchemaError` and
//! the compile path never produces validation messages.
use serde::Serialize;
use thiserror::Error;

use jschema_scope::UriError;

use crate::paths::{InstancePath, SchemaLocation};

/// Fatal error raised while compiling a schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Unsupported schema version {0}")]
    UnsupportedVersion(String),
    #[error("schema must be an object or a boolean")]
    InvalidDocumentShape,
    #[error("{keyword} must be {expected}")]
    InvalidKeywordShape {
        keyword: &'static str,
        expected: &'static str,
    },
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },
    #[error("duplicate schema identifier {0}")]
    DuplicateIdentifier(String),
    #[error("undefined reference {0}")]
    UndefinedReference(String),
    #[error("external schema {0} needs to be loaded, but no resolver returned it")]
    UnresolvedExternal(String),
    #[error("schema does not conform to its {draft} meta-schema: {detail}")]
    MetaSchema {
        draft: jschema_scope::Draft,
        detail: String,
    },
    #[error(transparent)]
    Uri(#[from] UriError),
}

/// A single validation failure, qualified by both its instance and schema
/// locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationMessage {
    /// JSON Pointer to the offending instance location.
    pub instance_location: String,
    /// Absolute URI of the schema keyword that failed.
    pub schema_location: String,
    /// The failing keyword.
    pub keyword: String,
    /// Human-readable description of the failure.
    pub message: String,
    /// Branch-level failures for applicators such as `anyOf` and `oneOf`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<ValidationMessage>,
}

impl ValidationMessage {
    pub(crate) fn new(
        location: &SchemaLocation,
        keyword: &'static str,
        instance: &InstancePath<'_>,
        message: String,
    ) -> ValidationMessage {
        ValidationMessage {
            instance_location: instance.to_pointer(),
            schema_location: location.to_string(),
            keyword: keyword.to_owned(),
            message,
            nested: Vec::new(),
        }
    }

    pub(crate) fn nested(mut self, nested: Vec<ValidationMessage>) -> ValidationMessage {
        self.nested = nested;
        self
    }
}

impl std::fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.instance_location.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_location, self.message)
        }
    }
}

/// Sink for streamed validation messages.
pub trait Reporter {
    fn report(&mut self, message: ValidationMessage);
}

impl Reporter for Vec<ValidationMessage> {
    fn report(&mut self, message: ValidationMessage) {
        self.push(message);
    }
}

/// Discards every message; used by the short-circuiting `is_valid` path.
pub(crate) struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _: ValidationMessage) {}
}
