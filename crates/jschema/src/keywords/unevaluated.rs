//! `unevaluatedProperties` and `unevaluatedItems`.
//!
//! The final sweep: everything the scope has not recorded as evaluated —
//! across `allOf` branches, conditionals and references — is validated
//! against the given subschema. These run last in a node's keyword order, so
//! the scope is complete by the time they fire.
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{Keyword, Validate};
use crate::nodes::SchemaNodeId;
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct UnevaluatedPropertiesValidator {
    node: SchemaNodeId,
    pub(crate) path: SchemaLocation,
}

impl UnevaluatedPropertiesValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "unevaluatedProperties"
    }
}

impl Validate for UnevaluatedPropertiesValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let Value::Object(object) = instance else {
            return true;
        };
        let forbids_everything = cx.arena().node(self.node).boolean == Some(false);
        let mut valid = true;
        for (name, value) in object {
            if scope.has_property(name) {
                continue;
            }
            let property_path = path.push_property(name);
            if forbids_everything {
                valid = false;
                cx.report(ValidationMessage::new(
                    &self.path,
                    self.keyword(),
                    &property_path,
                    format!("unevaluated property '{name}' is not permitted"),
                ));
                continue;
            }
            let mut child_scope = Scope::new();
            if cx.evaluate_node(self.node, value, &property_path, &mut child_scope) {
                scope.mark_property(name);
            } else {
                valid = false;
            }
        }
        valid
    }
}

pub(crate) struct UnevaluatedItemsValidator {
    node: SchemaNodeId,
    pub(crate) path: SchemaLocation,
}

impl UnevaluatedItemsValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "unevaluatedItems"
    }
}

impl Validate for UnevaluatedItemsValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let Value::Array(items) = instance else {
            return true;
        };
        let forbids_everything = cx.arena().node(self.node).boolean == Some(false);
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            if scope.has_index(index) {
                continue;
            }
            let item_path = path.push_index(index);
            if forbids_everything {
                valid = false;
                cx.report(ValidationMessage::new(
                    &self.path,
                    self.keyword(),
                    &item_path,
                    format!("unevaluated item at {index} is not permitted"),
                ));
                continue;
            }
            let mut child_scope = Scope::new();
            if cx.evaluate_node(self.node, item, &item_path, &mut child_scope) {
                scope.mark_index(index);
            } else {
                valid = false;
            }
        }
        valid
    }
}

pub(crate) fn compile_unevaluated_properties(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let node = compiler.compile_schema(&ctx.with_keyword("unevaluatedProperties"), schema)?;
    Ok(Some(Keyword::UnevaluatedProperties(
        UnevaluatedPropertiesValidator {
            node,
            path: ctx.keyword_location("unevaluatedProperties"),
        },
    )))
}

pub(crate) fn compile_unevaluated_items(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let node = compiler.compile_schema(&ctx.with_keyword("unevaluatedItems"), schema)?;
    Ok(Some(Keyword::UnevaluatedItems(UnevaluatedItemsValidator {
        node,
        path: ctx.keyword_location("unevaluatedItems"),
    })))
}
