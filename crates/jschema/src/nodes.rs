//! The compiled-schema arena.
//!
//! Every subschema becomes a [`SchemaNode`] owned by the [`SchemaArena`].
//! Keywords refer to other nodes through [`SchemaNodeId`] handles, and
//! reference keywords go through a separate slot table filled during the link
//! phase, so cycles cost nothing and the arena is frozen once compilation
//! returns.
use serde_json::Value;

use jschema_scope::Draft;

use crate::keywords::Keyword;
use crate::paths::SchemaLocation;

/// Handle of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SchemaNodeId(u32);

/// Handle of a reference target, filled in by the link phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RefSlot(u32);

/// A compiled subschema: its canonical URI, the draft it was compiled under,
/// and its frozen, ordered keyword list.
pub(crate) struct SchemaNode {
    pub(crate) uri: SchemaLocation,
    pub(crate) draft: Draft,
    pub(crate) keywords: Box<[Keyword]>,
    /// `Some` for the boolean shortcut schemas `true` / `false`.
    pub(crate) boolean: Option<bool>,
    /// Name under which this node is a `$dynamicAnchor`, for bookending.
    pub(crate) dynamic_anchor: Option<Box<str>>,
    /// `$recursiveAnchor: true` (2019-09).
    pub(crate) recursive_anchor: bool,
    /// Dynamic anchors declared inside this node's resource. Non-empty only
    /// for resource roots; pushed as one dynamic-scope frame on entry.
    pub(crate) dynamic_anchors: Box<[(Box<str>, SchemaNodeId)]>,
    /// Raw `default` member, consumed by the patch sink.
    pub(crate) default_value: Option<Value>,
}

pub(crate) struct SchemaArena {
    nodes: Vec<SchemaNode>,
    ref_targets: Vec<Option<SchemaNodeId>>,
}

impl SchemaArena {
    pub(crate) fn new() -> SchemaArena {
        SchemaArena {
            nodes: Vec::new(),
            ref_targets: Vec::new(),
        }
    }

    /// Reserves a node id before its keywords exist, so self-references and
    /// anchor registrations can point at it while it is being built.
    pub(crate) fn reserve(&mut self, uri: SchemaLocation, draft: Draft) -> SchemaNodeId {
        let id = SchemaNodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(SchemaNode {
            uri,
            draft,
            keywords: Box::new([]),
            boolean: None,
            dynamic_anchor: None,
            recursive_anchor: false,
            dynamic_anchors: Box::new([]),
            default_value: None,
        });
        id
    }

    pub(crate) fn node(&self, id: SchemaNodeId) -> &SchemaNode {
        &self.nodes[id.0 as usize]
    }

    pub(crate) fn node_mut(&mut self, id: SchemaNodeId) -> &mut SchemaNode {
        &mut self.nodes[id.0 as usize]
    }

    pub(crate) fn new_ref_slot(&mut self) -> RefSlot {
        let slot = RefSlot(u32::try_from(self.ref_targets.len()).unwrap_or(u32::MAX));
        self.ref_targets.push(None);
        slot
    }

    pub(crate) fn link(&mut self, slot: RefSlot, target: SchemaNodeId) {
        self.ref_targets[slot.0 as usize] = Some(target);
    }

    /// Target of a linked reference. Compilation fails before an unlinked
    /// slot can be observed by evaluation; an unlinked slot here means the
    /// link phase was skipped and the reference behaves as a `true` schema.
    pub(crate) fn target(&self, slot: RefSlot) -> Option<SchemaNodeId> {
        self.ref_targets[slot.0 as usize]
    }

    /// Number of reference slots without a target; zero after a successful
    /// compile (reference closure).
    pub(crate) fn unlinked_count(&self) -> usize {
        self.ref_targets.iter().filter(|slot| slot.is_none()).count()
    }

    /// The `default` for a property subschema, looking through references so
    /// that `{"$ref": "#/$defs/port"}` still contributes the target's
    /// default.
    pub(crate) fn default_value(&self, id: SchemaNodeId) -> Option<&Value> {
        let mut current = id;
        for _ in 0..8 {
            let node = self.node(current);
            if let Some(value) = &node.default_value {
                return Some(value);
            }
            let next = node
                .keywords
                .iter()
                .find_map(|keyword| keyword.static_ref_slot())
                .and_then(|slot| self.target(slot));
            match next {
                Some(target) => current = target,
                None => return None,
            }
        }
        None
    }
}
