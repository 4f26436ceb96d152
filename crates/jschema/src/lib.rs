//! # jschema
//!
//! A JSON Schema compiler and validator for drafts 4, 6, 7, 2019-09 and
//! 2020-12.
//!
//! Compilation ingests one or more schema documents, resolves `$id` /
//! `$anchor` / `$ref` / `$dynamicRef` graphs across them (fetching external
//! documents through caller-supplied resolvers), and produces an immutable
//! [`CompiledSchema`] that can be shared across threads. Evaluation streams
//! path-qualified [`ValidationMessage`]s to a [`Reporter`], and can
//! additionally emit a JSON-Patch array injecting missing defaults or a
//! structured evaluation trace.
//!
//! ```
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string"}},
//!     "required": ["name"]
//! });
//! let validator = jschema::compile(&schema).expect("valid schema");
//!
//! assert!(validator.is_valid(&json!({"name": "widget"})));
//!
//! let mut messages = Vec::new();
//! validator.validate(&json!({}), &mut messages);
//! assert_eq!(messages[0].message, "required property 'name' not found");
//! ```
mod compiler;
mod content;
mod context;
mod ecma;
mod equality;
mod error;
mod evaluation;
mod formats;
mod keywords;
mod nodes;
mod options;
mod paths;
mod registry;
mod resolver;
mod trace;

use serde_json::Value;

pub use jschema_scope::Draft;

pub use error::{Reporter, SchemaError, ValidationMessage};
pub use evaluation::{PatchOp, PatchOperation};
pub use options::CompileOptions;
pub use resolver::Resolve;
pub use trace::TraceNode;

use error::NullReporter;
use nodes::{SchemaArena, SchemaNodeId};

/// Compiles a schema with default options.
pub fn compile(schema: &Value) -> Result<CompiledSchema, SchemaError> {
    options().build(schema)
}

/// Starts a [`CompileOptions`] builder.
#[must_use]
pub fn options() -> CompileOptions {
    CompileOptions::default()
}

/// An immutable compiled schema.
///
/// Owns the node arena and the root handle. Validation never mutates it, so
/// one compiled schema serves any number of concurrent validations.
pub struct CompiledSchema {
    arena: SchemaArena,
    root: SchemaNodeId,
    draft: Draft,
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

impl CompiledSchema {
    pub(crate) fn new(arena: SchemaArena, root: SchemaNodeId, draft: Draft) -> CompiledSchema {
        CompiledSchema { arena, root, draft }
    }

    /// The draft the root document was compiled under.
    #[must_use]
    pub fn draft(&self) -> Draft {
        self.draft
    }

    /// Short-circuits at the first failure.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        evaluation::run(
            &self.arena,
            self.root,
            instance,
            &mut NullReporter,
            true,
            false,
            false,
        )
        .valid
    }

    /// Streams every failure to `reporter`; returns overall validity.
    pub fn validate(&self, instance: &Value, reporter: &mut dyn Reporter) -> bool {
        evaluation::run(
            &self.arena,
            self.root,
            instance,
            reporter,
            false,
            false,
            false,
        )
        .valid
    }

    /// Validates while collecting a JSON-Patch array of `add` operations
    /// that inject `default` values for missing object properties, in
    /// document order.
    pub fn validate_with_patch(
        &self,
        instance: &Value,
        reporter: &mut dyn Reporter,
    ) -> Vec<PatchOperation> {
        evaluation::run(&self.arena, self.root, instance, reporter, false, true, false).patch
    }

    /// Produces a structured evaluation trace: one record per keyword, with
    /// subschema applications nested under their applicator.
    #[must_use]
    pub fn trace(&self, instance: &Value) -> TraceNode {
        let outcome = evaluation::run(
            &self.arena,
            self.root,
            instance,
            &mut NullReporter,
            false,
            false,
            true,
        );
        let valid = outcome.valid;
        outcome.trace.unwrap_or_else(|| TraceNode {
            schema_location: self.arena.node(self.root).uri.to_string(),
            instance_location: String::new(),
            keyword: String::new(),
            valid,
            children: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn compiled_schemas_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<crate::CompiledSchema>();
    }

    #[test]
    fn reference_closure_after_compile() {
        let schema = json!({
            "$defs": {
                "node": {
                    "properties": {"next": {"$ref": "#/$defs/node"}}
                }
            },
            "$ref": "#/$defs/node"
        });
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.arena.unlinked_count(), 0);
    }

    #[test]
    fn compile_is_idempotent() {
        let schema = json!({
            "type": "object",
            "properties": {"n": {"minimum": 3}},
            "additionalProperties": false
        });
        let first = crate::compile(&schema).expect("valid schema");
        let second = crate::compile(&schema).expect("valid schema");
        for instance in [
            json!({"n": 5}),
            json!({"n": 1}),
            json!({"other": 1}),
            json!(17),
        ] {
            assert_eq!(first.is_valid(&instance), second.is_valid(&instance));
        }
    }

    #[test]
    fn validation_is_deterministic() {
        let schema = json!({
            "properties": {
                "a": {"type": "integer"},
                "b": {"type": "integer"}
            },
            "required": ["a", "b", "c"]
        });
        let validator = crate::compile(&schema).expect("valid schema");
        let instance = json!({"a": "x", "b": "y"});
        let mut first = Vec::new();
        validator.validate(&instance, &mut first);
        for _ in 0..3 {
            let mut again = Vec::new();
            validator.validate(&instance, &mut again);
            assert_eq!(first, again);
        }
    }

    #[test]
    fn non_schema_documents_are_rejected() {
        assert!(matches!(
            crate::compile(&json!(42)),
            Err(crate::SchemaError::InvalidDocumentShape)
        ));
        assert!(crate::compile(&json!(true)).is_ok());
        assert!(crate::compile(&json!(false)).is_ok());
    }

    #[test]
    fn unsupported_schema_version() {
        let schema = json!({"$schema": "https://json-schema.org/draft/2022-01/schema"});
        let error = crate::compile(&schema).unwrap_err();
        assert!(error
            .to_string()
            .starts_with("Unsupported schema version"));
    }
}
