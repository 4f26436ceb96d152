//! Compile-time registry of schema identifiers.
//!
//! Three tables drive reference resolution: the schema dictionary mapping
//! normalised absolute URIs to arena nodes, the unresolved-reference list
//! drained by the link phase, and the unknown-keyword table holding raw
//! subtrees that a later reference may promote into real schemas. All of it
//! is private to compilation; nothing here survives into the compiled
//! schema.
use ahash::{AHashMap, AHashSet};
use serde_json::Value;

use jschema_scope::Draft;

use crate::error::SchemaError;
use crate::nodes::{RefSlot, SchemaNodeId};

#[derive(Default)]
pub(crate) struct Registry {
    schemas: AHashMap<String, SchemaNodeId>,
    unresolved: Vec<(String, RefSlot)>,
    unknown: AHashMap<String, (Draft, Value)>,
    loaded: AHashSet<String>,
}

impl Registry {
    pub(crate) fn new() -> Registry {
        Registry::default()
    }

    /// Registers a node under an identifier. Identifiers claimed through
    /// `$id` or an anchor must be unique; JSON Pointer path registrations
    /// tolerate repeats (first wins).
    pub(crate) fn insert_schema(
        &mut self,
        uri: String,
        node: SchemaNodeId,
        strict: bool,
    ) -> Result<(), SchemaError> {
        if self.schemas.contains_key(&uri) {
            if strict {
                return Err(SchemaError::DuplicateIdentifier(uri));
            }
            return Ok(());
        }
        self.schemas.insert(uri, node);
        Ok(())
    }

    pub(crate) fn get(&self, uri: &str) -> Option<SchemaNodeId> {
        self.schemas.get(uri).copied()
    }

    pub(crate) fn add_unresolved(&mut self, uri: String, slot: RefSlot) {
        self.unresolved.push((uri, slot));
    }

    /// Whether some reference is waiting for `uri`; such an unknown-keyword
    /// subtree is promoted on sight instead of parked.
    pub(crate) fn has_pending_ref(&self, uri: &str) -> bool {
        self.unresolved.iter().any(|(pending, _)| pending == uri)
    }

    pub(crate) fn insert_unknown(&mut self, uri: String, draft: Draft, value: Value) {
        self.unknown.entry(uri).or_insert((draft, value));
    }

    pub(crate) fn take_unknown(&mut self, uri: &str) -> Option<(Draft, Value)> {
        self.unknown.remove(uri)
    }

    pub(crate) fn mark_loaded(&mut self, document_uri: &str) {
        self.loaded.insert(document_uri.to_owned());
    }

    pub(crate) fn is_loaded(&self, document_uri: &str) -> bool {
        self.loaded.contains(document_uri)
    }

    /// Snapshot of the distinct identifiers still waiting for a target.
    pub(crate) fn pending_targets(&self) -> Vec<String> {
        let mut seen = AHashSet::new();
        self.unresolved
            .iter()
            .filter(|(uri, _)| seen.insert(uri.clone()))
            .map(|(uri, _)| uri.clone())
            .collect()
    }

    pub(crate) fn drain_unresolved(&mut self) -> Vec<(String, RefSlot)> {
        std::mem::take(&mut self.unresolved)
    }
}
