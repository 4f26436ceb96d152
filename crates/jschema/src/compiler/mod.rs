//! The draft-parameterised schema builder.
//!
//! `compile_schema` walks raw schema JSON and emits arena nodes whose
//! keyword lists follow a fixed evaluation order: assertions, logic
//! applicators, references, property/item applicators, and the unevaluated
//! sweeps last. Draft differences are a thin layer: the vocabulary gate
//! decides which keys are keywords at all, and the handful of
//! shape-divergent producers consult the context's draft.
mod table;

use serde_json::{Map, Value};

use jschema_scope::{meta, uri, uri::Fragment, Draft};

pub(crate) use crate::context::BuildContext;

use crate::error::SchemaError;
use crate::keywords::{expect_str, reference, Keyword};
use crate::nodes::{RefSlot, SchemaArena, SchemaNodeId};
use crate::options::CompileOptions;
use crate::registry::Registry;

/// Draft of a document root: its `$schema` member when present (exact match
/// required), the configured default otherwise.
pub(crate) fn detect_draft(document: &Value, default: Draft) -> Result<Draft, SchemaError> {
    match Draft::schema_member(document) {
        Some(declared) => Draft::from_schema_uri(declared)
            .ok_or_else(|| SchemaError::UnsupportedVersion(declared.to_owned())),
        None => Ok(default),
    }
}

pub(crate) struct Compiler<'o> {
    pub(crate) arena: SchemaArena,
    registry: Registry,
    options: &'o CompileOptions,
    /// One buffer per resource root currently being built; `$dynamicAnchor`
    /// declarations land in the innermost buffer and become that resource's
    /// dynamic-scope frame.
    dynamic_buffers: Vec<Vec<(Box<str>, SchemaNodeId)>>,
}

impl<'o> Compiler<'o> {
    pub(crate) fn new(options: &'o CompileOptions) -> Compiler<'o> {
        Compiler {
            arena: SchemaArena::new(),
            registry: Registry::new(),
            options,
            dynamic_buffers: Vec::new(),
        }
    }

    pub(crate) fn options(&self) -> &CompileOptions {
        self.options
    }

    /// Compiles one document in its own base, with its own `$schema`.
    pub(crate) fn compile_document(
        &mut self,
        document: &Value,
        retrieval_uri: &str,
    ) -> Result<SchemaNodeId, SchemaError> {
        let draft = detect_draft(document, self.options.default_draft())?;
        let base = uri::parse(uri::strip_empty_fragment(retrieval_uri))?;
        self.registry.mark_loaded(base.as_str());
        let ctx = BuildContext::root(base, draft);
        self.compile_schema(&ctx, document)
    }

    pub(crate) fn compile_schema(
        &mut self,
        ctx: &BuildContext,
        schema: &Value,
    ) -> Result<SchemaNodeId, SchemaError> {
        match schema {
            Value::Bool(value) => {
                let id = self.arena.reserve(ctx.schema_location(), ctx.draft());
                self.arena.node_mut(id).boolean = Some(*value);
                self.registry.insert_schema(ctx.absolute_uri(), id, false)?;
                Ok(id)
            }
            Value::Object(map) => self.compile_object(ctx, map),
            _ => Err(SchemaError::InvalidDocumentShape),
        }
    }

    fn compile_object(
        &mut self,
        parent_ctx: &BuildContext,
        map: &Map<String, Value>,
    ) -> Result<SchemaNodeId, SchemaError> {
        let draft = parent_ctx.draft();
        let path_uri = parent_ctx.absolute_uri();
        let mut ctx = parent_ctx.clone();
        let mut anchor_alias = None;
        let mut id_origin = false;

        // `$id` (or draft 4 `id`): a non-fragment part pushes a new base; a
        // plain-name fragment is a legacy anchor alias.
        if let Some(id_value) = map.get(draft.identifier_keyword()) {
            let id_text = expect_str(id_value, draft.identifier_keyword())?;
            let resolved = ctx.resolve(id_text)?;
            let resolved_text = resolved.as_str().to_owned();
            if matches!(Fragment::of(&resolved_text), Fragment::Anchor(_)) {
                anchor_alias = Some(resolved_text.clone());
            }
            let document = uri::without_fragment(&resolved_text);
            if document != ctx.base_str() {
                ctx = ctx.with_base(uri::parse(document)?);
                id_origin = true;
                // An embedded resource never needs external loading.
                self.registry.mark_loaded(document);
            }
        }

        let node_id = self.arena.reserve(ctx.schema_location(), draft);
        let canonical = ctx.absolute_uri();
        self.registry
            .insert_schema(canonical.clone(), node_id, id_origin)?;
        if path_uri != canonical {
            self.registry.insert_schema(path_uri, node_id, false)?;
        }
        if let Some(alias) = anchor_alias {
            self.registry.insert_schema(alias, node_id, true)?;
        }

        let resource_root = ctx.is_resource_root();
        if resource_root {
            self.dynamic_buffers.push(Vec::new());
        }

        let mut dynamic_anchor: Option<Box<str>> = None;
        let mut recursive_anchor = false;
        if draft.recognizes("$anchor") {
            if let Some(anchor) = map.get("$anchor") {
                let name = expect_str(anchor, "$anchor")?;
                self.register_anchor(&ctx, name, node_id)?;
            }
        }
        if draft.recognizes("$dynamicAnchor") {
            if let Some(anchor) = map.get("$dynamicAnchor") {
                let name = expect_str(anchor, "$dynamicAnchor")?;
                self.register_anchor(&ctx, name, node_id)?;
                dynamic_anchor = Some(Box::from(name));
                if let Some(buffer) = self.dynamic_buffers.last_mut() {
                    if !buffer.iter().any(|(existing, _)| existing.as_ref() == name) {
                        buffer.push((Box::from(name), node_id));
                    }
                }
            }
        }
        if draft.recognizes("$recursiveAnchor") {
            if let Some(flag) = map.get("$recursiveAnchor") {
                recursive_anchor =
                    flag.as_bool().ok_or(SchemaError::InvalidKeywordShape {
                        keyword: "$recursiveAnchor",
                        expected: "a boolean",
                    })?;
            }
        }

        let mut keywords: Vec<Keyword> = Vec::new();
        if draft.ref_ignores_siblings() && map.contains_key("$ref") {
            // Up to draft 7 `$ref` shadows its siblings, but `definitions`
            // are still compiled so pointer targets into them exist.
            if let Some(definitions) = map.get("definitions") {
                table::compile_definitions(self, &ctx, map, definitions)?;
            }
            if let Some(reference_value) = map.get("$ref") {
                if let Some(keyword) = reference::compile_ref(self, &ctx, map, reference_value)? {
                    keywords.push(keyword);
                }
            }
            // Shadowed siblings produce no validators, but unrecognised
            // subtrees are still preserved so references can reach them.
            for (key, value) in map {
                if !draft.recognizes(key) {
                    self.record_unknown(&canonical, draft, key, value)?;
                }
            }
        } else {
            for (name, producer) in table::PRODUCERS {
                if !draft.recognizes(name) {
                    continue;
                }
                if let Some(value) = map.get(*name) {
                    if let Some(keyword) = producer(self, &ctx, map, value)? {
                        keywords.push(keyword);
                    }
                }
            }
            for (key, value) in map {
                if !draft.recognizes(key) {
                    self.record_unknown(&canonical, draft, key, value)?;
                }
            }
        }

        let dynamic_anchors = if resource_root {
            self.dynamic_buffers.pop().unwrap_or_default().into_boxed_slice()
        } else {
            Box::default()
        };

        let node = self.arena.node_mut(node_id);
        node.keywords = keywords.into_boxed_slice();
        node.dynamic_anchor = dynamic_anchor;
        node.recursive_anchor = recursive_anchor;
        node.dynamic_anchors = dynamic_anchors;
        node.default_value = map.get("default").cloned();
        Ok(node_id)
    }

    fn register_anchor(
        &mut self,
        ctx: &BuildContext,
        name: &str,
        node: SchemaNodeId,
    ) -> Result<(), SchemaError> {
        let alias = format!("{}#{}", ctx.base_str(), uri::encode_fragment(name));
        self.registry.insert_schema(alias, node, true)
    }

    /// Creates a reference slot for an absolute target identifier: linked now
    /// when the target is known, promoted from the unknown-keyword table when
    /// possible, parked on the unresolved list otherwise.
    pub(crate) fn reference_slot(&mut self, target: &str) -> Result<RefSlot, SchemaError> {
        let key = uri::strip_empty_fragment(target).to_owned();
        let slot = self.arena.new_ref_slot();
        if let Some(node) = self.registry.get(&key) {
            self.arena.link(slot, node);
            return Ok(slot);
        }
        // Only a JSON Pointer can address an unknown-keyword subtree.
        if let Fragment::Pointer(pointer) = Fragment::of(&key) {
            if let Some((draft, value)) = self.registry.take_unknown(&key) {
                let document = uri::parse(uri::without_fragment(&key))?;
                let ctx = BuildContext::at_pointer(document, &pointer, draft);
                let node = self.compile_promoted(&ctx, &value)?;
                self.arena.link(slot, node);
                return Ok(slot);
            }
        }
        self.registry.add_unresolved(key, slot);
        Ok(slot)
    }

    /// Preserves a subtree found under an unrecognised key, promoting it on
    /// the spot when a reference is already waiting for it.
    fn record_unknown(
        &mut self,
        parent_uri: &str,
        draft: Draft,
        key: &str,
        value: &Value,
    ) -> Result<(), SchemaError> {
        let unknown_uri = uri::append_pointer_token(parent_uri, key);
        if let Fragment::Pointer(pointer) = Fragment::of(&unknown_uri) {
            if self.registry.has_pending_ref(&unknown_uri)
                && (value.is_object() || value.is_boolean())
            {
                let document = uri::parse(uri::without_fragment(&unknown_uri))?;
                let ctx = BuildContext::at_pointer(document, &pointer, draft);
                self.compile_promoted(&ctx, value)?;
            } else {
                self.registry
                    .insert_unknown(unknown_uri.clone(), draft, value.clone());
            }
            if let Value::Object(members) = value {
                for (child_key, child_value) in members {
                    self.record_unknown(&unknown_uri, draft, child_key, child_value)?;
                }
            }
        }
        Ok(())
    }

    /// Compiles a promoted subtree with its own dynamic-anchor collection, as
    /// it does not belong to the resource currently on the buffer stack.
    fn compile_promoted(
        &mut self,
        ctx: &BuildContext,
        value: &Value,
    ) -> Result<SchemaNodeId, SchemaError> {
        self.dynamic_buffers.push(Vec::new());
        let compiled = self.compile_schema(ctx, value);
        let buffer = self.dynamic_buffers.pop().unwrap_or_default();
        if let Ok(id) = compiled {
            if !buffer.is_empty() {
                let node = self.arena.node_mut(id);
                let mut merged = node.dynamic_anchors.to_vec();
                merged.extend(buffer);
                node.dynamic_anchors = merged.into_boxed_slice();
            }
        }
        compiled
    }

    /// Fixed-point loop fetching external documents through the resolver
    /// chain until a full pass loads nothing new.
    pub(crate) fn load_external_documents(&mut self) -> Result<(), SchemaError> {
        loop {
            let mut loaded = 0usize;
            for target in self.registry.pending_targets() {
                if self.registry.get(&target).is_some() {
                    continue;
                }
                let document_uri = uri::without_fragment(&target).to_owned();
                if self.registry.is_loaded(&document_uri) {
                    continue;
                }
                let Some(document) = self.fetch(&document_uri) else {
                    return Err(SchemaError::UnresolvedExternal(document_uri));
                };
                self.compile_document(&document, &document_uri)?;
                loaded += 1;
            }
            if loaded == 0 {
                return Ok(());
            }
        }
    }

    /// First-match resolver chain: the bundled meta-schemas, then the
    /// caller's resolvers in registration order.
    fn fetch(&self, document_uri: &str) -> Option<Value> {
        if let Some(bundled) = meta::by_uri(document_uri) {
            return Some(bundled.clone());
        }
        for resolver in self.options.resolvers() {
            if let Some(document) = resolver.resolve(document_uri) {
                return Some(document);
            }
        }
        None
    }

    /// Links every parked reference, storing pointers without traversal so
    /// cycles are fine. A miss here is the terminal "undefined reference".
    pub(crate) fn link(&mut self) -> Result<(), SchemaError> {
        for (target, slot) in self.registry.drain_unresolved() {
            match self.registry.get(&target) {
                Some(node) => self.arena.link(slot, node),
                None => return Err(SchemaError::UndefinedReference(target)),
            }
        }
        Ok(())
    }
}
