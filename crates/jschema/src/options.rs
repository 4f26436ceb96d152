//! Compilation options.
use std::sync::Arc;

use serde_json::Value;

use jschema_scope::{meta, uri, Draft};

use crate::compiler::{detect_draft, Compiler};
use crate::error::SchemaError;
use crate::resolver::Resolve;
use crate::CompiledSchema;

/// Builder-style options for [`crate::compile`]-equivalent compilation.
///
/// ```
/// use serde_json::json;
///
/// let schema = json!({"type": "string", "format": "ipv4"});
/// let validator = jschema::options()
///     .assert_formats(true)
///     .build(&schema)
///     .expect("valid schema");
/// assert!(validator.is_valid(&json!("127.0.0.1")));
/// assert!(!validator.is_valid(&json!("not-an-ip")));
/// ```
#[derive(Clone)]
pub struct CompileOptions {
    default_draft: Draft,
    assert_formats: bool,
    verify_meta_schema: bool,
    resolvers: Vec<Arc<dyn Resolve>>,
}

impl Default for CompileOptions {
    fn default() -> CompileOptions {
        CompileOptions {
            default_draft: Draft::Draft202012,
            assert_formats: false,
            verify_meta_schema: false,
            resolvers: Vec::new(),
        }
    }
}

impl CompileOptions {
    /// Draft assumed when a document carries no `$schema`.
    #[must_use]
    pub fn with_draft(mut self, draft: Draft) -> CompileOptions {
        self.default_draft = draft;
        self
    }

    /// Turns `format` from an annotation into an assertion.
    #[must_use]
    pub fn assert_formats(mut self, yes: bool) -> CompileOptions {
        self.assert_formats = yes;
        self
    }

    /// Validates the schema document against its draft's meta-schema before
    /// building; violations become a fatal [`SchemaError`].
    #[must_use]
    pub fn verify_meta_schema(mut self, yes: bool) -> CompileOptions {
        self.verify_meta_schema = yes;
        self
    }

    /// Appends a resolver to the chain. Resolvers are tried in registration
    /// order, after the bundled meta-schema resolver; the first document
    /// returned wins.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl Resolve + 'static) -> CompileOptions {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Compiles `schema` with the default base URI.
    pub fn build(&self, schema: &Value) -> Result<CompiledSchema, SchemaError> {
        self.build_with_retrieval_uri(schema, uri::DEFAULT_BASE_URI)
    }

    /// Compiles `schema` as if it had been retrieved from `retrieval_uri`,
    /// which becomes the base for relative references.
    pub fn build_with_retrieval_uri(
        &self,
        schema: &Value,
        retrieval_uri: &str,
    ) -> Result<CompiledSchema, SchemaError> {
        if !(schema.is_object() || schema.is_boolean()) {
            return Err(SchemaError::InvalidDocumentShape);
        }
        let draft = detect_draft(schema, self.default_draft)?;
        if self.verify_meta_schema {
            self.check_meta_conformance(schema, draft)?;
        }
        let mut compiler = Compiler::new(self);
        let root = compiler.compile_document(schema, retrieval_uri)?;
        compiler.load_external_documents()?;
        compiler.link()?;
        debug_assert_eq!(compiler.arena.unlinked_count(), 0);
        Ok(CompiledSchema::new(compiler.arena, root, draft))
    }

    fn check_meta_conformance(&self, schema: &Value, draft: Draft) -> Result<(), SchemaError> {
        let meta_options = CompileOptions {
            default_draft: draft,
            assert_formats: false,
            verify_meta_schema: false,
            resolvers: Vec::new(),
        };
        let meta_validator = meta_options.build_with_retrieval_uri(
            meta::schema(draft),
            uri::strip_empty_fragment(draft.schema_uri()),
        )?;
        let mut messages = Vec::new();
        meta_validator.validate(schema, &mut messages);
        match messages.first() {
            None => Ok(()),
            Some(first) => Err(SchemaError::MetaSchema {
                draft,
                detail: first.to_string(),
            }),
        }
    }

    pub(crate) fn default_draft(&self) -> Draft {
        self.default_draft
    }

    pub(crate) fn formats_asserted(&self) -> bool {
        self.assert_formats
    }

    pub(crate) fn resolvers(&self) -> &[Arc<dyn Resolve>] {
        &self.resolvers
    }
}
