//! The evaluation engine.
//!
//! All mutable validation state lives here, scoped to a single `validate`
//! call: the capture stack that keeps branch errors out of the reporter, the
//! evaluated property/item sets consumed by `unevaluatedProperties` and
//! `unevaluatedItems`, the dynamic-anchor stack for `$dynamicRef`, the
//! single-slot recursive base for `$recursiveRef`, and the optional patch and
//! trace sinks. The compiled arena is never mutated, which is what makes a
//! compiled schema shareable across threads.
use ahash::AHashSet;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Reporter, ValidationMessage};
use crate::keywords::Validate;
use crate::nodes::{SchemaArena, SchemaNodeId};
use crate::paths::InstancePath;
use crate::trace::{TraceBuilder, TraceNode};

/// A JSON-Patch `add` operation produced by the defaults sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
}

/// Evaluated property names and item indices of the instance location
/// currently under evaluation.
#[derive(Default)]
pub(crate) struct Scope {
    properties: AHashSet<String>,
    items: AHashSet<usize>,
}

impl Scope {
    pub(crate) fn new() -> Scope {
        Scope::default()
    }

    pub(crate) fn mark_property(&mut self, name: &str) {
        if !self.properties.contains(name) {
            self.properties.insert(name.to_owned());
        }
    }

    pub(crate) fn mark_index(&mut self, index: usize) {
        self.items.insert(index);
    }

    pub(crate) fn has_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    pub(crate) fn has_index(&self, index: usize) -> bool {
        self.items.contains(&index)
    }

    /// Unions a successful branch's evaluations into this scope.
    pub(crate) fn absorb(&mut self, branch: Scope) {
        self.properties.extend(branch.properties);
        self.items.extend(branch.items);
    }
}

/// Outcome of probing a subschema with errors captured.
pub(crate) struct Probe {
    pub(crate) valid: bool,
    pub(crate) messages: Vec<ValidationMessage>,
    pub(crate) scope: Scope,
}

pub(crate) struct EvalContext<'a, 'r> {
    arena: &'a SchemaArena,
    reporter: &'r mut dyn Reporter,
    capture: Vec<Vec<ValidationMessage>>,
    fail_fast: bool,
    patch: Option<Vec<PatchOperation>>,
    trace: Option<TraceBuilder>,
    dynamic_frames: Vec<&'a [(Box<str>, SchemaNodeId)]>,
    recursive_base: Option<SchemaNodeId>,
}

impl<'a, 'r> EvalContext<'a, 'r> {
    pub(crate) fn arena(&self) -> &'a SchemaArena {
        self.arena
    }

    /// Runs one node against an instance: dynamic-scope entry, the keyword
    /// list in its compiled order, dynamic-scope exit.
    pub(crate) fn evaluate_node(
        &mut self,
        id: SchemaNodeId,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let arena = self.arena;
        let node = arena.node(id);

        if let Some(value) = node.boolean {
            if !value {
                self.report(ValidationMessage::new(
                    &node.uri,
                    "schema",
                    path,
                    "false schema always fails".to_owned(),
                ));
            }
            if self.trace.is_some() {
                self.trace_begin(node.uri.to_string(), path.to_pointer(), "");
                self.trace_end(value);
            }
            return value;
        }

        let pushed_frame = if node.dynamic_anchors.is_empty() {
            false
        } else {
            self.dynamic_frames.push(&node.dynamic_anchors);
            true
        };
        let set_recursive_base = node.recursive_anchor && self.recursive_base.is_none();
        if set_recursive_base {
            self.recursive_base = Some(id);
        }

        let mut valid = true;
        for keyword in &node.keywords {
            let ok = if self.trace.is_some() {
                self.trace_begin(
                    keyword.location().to_string(),
                    path.to_pointer(),
                    keyword.name(),
                );
                let ok = keyword.validate(self, instance, path, scope);
                self.trace_end(ok);
                ok
            } else {
                keyword.validate(self, instance, path, scope)
            };
            if !ok {
                valid = false;
                if self.fail_fast {
                    break;
                }
            }
        }

        if set_recursive_base {
            self.recursive_base = None;
        }
        if pushed_frame {
            self.dynamic_frames.pop();
        }
        valid
    }

    /// Evaluates a branch applied to the same instance location, streaming
    /// its errors, and unions its evaluations on success.
    pub(crate) fn evaluate_branch(
        &mut self,
        id: SchemaNodeId,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let mut branch = Scope::new();
        let valid = self.evaluate_node(id, instance, path, &mut branch);
        if valid {
            scope.absorb(branch);
        }
        valid
    }

    /// Evaluates a subschema with errors captured instead of reported, for
    /// applicators whose branch failures are not instance failures.
    pub(crate) fn probe_node(
        &mut self,
        id: SchemaNodeId,
        instance: &Value,
        path: &InstancePath<'_>,
    ) -> Probe {
        self.capture.push(Vec::new());
        let mut scope = Scope::new();
        let valid = self.evaluate_node(id, instance, path, &mut scope);
        let messages = self.capture.pop().unwrap_or_default();
        Probe {
            valid,
            messages,
            scope,
        }
    }

    pub(crate) fn report(&mut self, message: ValidationMessage) {
        if let Some(buffer) = self.capture.last_mut() {
            buffer.push(message);
        } else {
            self.reporter.report(message);
        }
    }

    /// First match for `name` from the outermost dynamic-scope frame.
    pub(crate) fn lookup_dynamic_anchor(&self, name: &str) -> Option<SchemaNodeId> {
        for frame in &self.dynamic_frames {
            if let Some((_, id)) = frame.iter().find(|(anchor, _)| anchor.as_ref() == name) {
                return Some(*id);
            }
        }
        None
    }

    pub(crate) fn recursive_base(&self) -> Option<SchemaNodeId> {
        self.recursive_base
    }

    /// Defaults are only injected on the reported evaluation path, never
    /// inside probed branches whose outcome may be discarded.
    pub(crate) fn patch_enabled(&self) -> bool {
        self.patch.is_some() && self.capture.is_empty()
    }

    pub(crate) fn emit_default(&mut self, pointer: String, value: &Value) {
        if let Some(patch) = &mut self.patch {
            patch.push(PatchOperation {
                op: PatchOp::Add,
                path: pointer,
                value: value.clone(),
            });
        }
    }

    /// With a trace sink attached, `anyOf` keeps evaluating after its first
    /// passing branch so the trace is complete.
    pub(crate) fn exhaustive_branches(&self) -> bool {
        self.trace.is_some()
    }

    fn trace_begin(&mut self, schema_location: String, instance_location: String, keyword: &str) {
        if let Some(trace) = &mut self.trace {
            trace.begin(schema_location, instance_location, keyword);
        }
    }

    fn trace_end(&mut self, valid: bool) {
        if let Some(trace) = &mut self.trace {
            trace.end(valid);
        }
    }
}

pub(crate) struct EvalOutcome {
    pub(crate) valid: bool,
    pub(crate) patch: Vec<PatchOperation>,
    pub(crate) trace: Option<TraceNode>,
}

pub(crate) fn run(
    arena: &SchemaArena,
    root: SchemaNodeId,
    instance: &Value,
    reporter: &mut dyn Reporter,
    fail_fast: bool,
    collect_patch: bool,
    collect_trace: bool,
) -> EvalOutcome {
    let mut cx = EvalContext {
        arena,
        reporter,
        capture: Vec::new(),
        fail_fast,
        patch: collect_patch.then(Vec::new),
        trace: collect_trace.then(|| TraceBuilder::new(arena.node(root).uri.to_string())),
        dynamic_frames: Vec::new(),
        recursive_base: None,
    };
    let mut scope = Scope::new();
    let path = InstancePath::root();
    let valid = cx.evaluate_node(root, instance, &path, &mut scope);
    EvalOutcome {
        valid,
        patch: cx.patch.unwrap_or_default(),
        trace: cx.trace.map(|trace| trace.finish(valid)),
    }
}
