//! Structured evaluation traces.
//!
//! When a trace sink is attached, the engine emits one record per keyword
//! evaluation; records of subschema applications nest under the applicator
//! that ran them, so the result is a tree mirroring the validator structure.
use serde::Serialize;

/// One keyword evaluation record.
#[derive(Debug, Clone, Serialize)]
pub struct TraceNode {
    /// Absolute URI of the evaluated schema location.
    pub schema_location: String,
    /// JSON Pointer to the instance location it was applied to.
    pub instance_location: String,
    /// Keyword name, empty for whole-schema records (boolean schemas, root).
    pub keyword: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TraceNode>,
}

/// Builds the tree with a stack of open records.
pub(crate) struct TraceBuilder {
    stack: Vec<TraceNode>,
}

impl TraceBuilder {
    pub(crate) fn new(root_location: String) -> TraceBuilder {
        TraceBuilder {
            stack: vec![TraceNode {
                schema_location: root_location,
                instance_location: String::new(),
                keyword: String::new(),
                valid: true,
                children: Vec::new(),
            }],
        }
    }

    pub(crate) fn begin(&mut self, schema_location: String, instance_location: String, keyword: &str) {
        self.stack.push(TraceNode {
            schema_location,
            instance_location,
            keyword: keyword.to_owned(),
            valid: true,
            children: Vec::new(),
        });
    }

    pub(crate) fn end(&mut self, valid: bool) {
        if let Some(mut record) = self.stack.pop() {
            record.valid = valid;
            match self.stack.last_mut() {
                Some(parent) => parent.children.push(record),
                None => self.stack.push(record),
            }
        }
    }

    pub(crate) fn finish(mut self, valid: bool) -> TraceNode {
        let mut root = self.stack.swap_remove(0);
        root.valid = valid;
        root
    }
}
