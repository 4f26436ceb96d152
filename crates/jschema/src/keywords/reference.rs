//! `$ref`, `$dynamicRef`, `$recursiveRef`.
//!
//! A reference evaluates its target like an `allOf` branch: errors stream
//! through, and the target's evaluated properties/items are unioned into the
//! referring scope on success, which is what lets `unevaluatedProperties`
//! see across references.
use serde_json::{Map, Value};

use jschema_scope::uri::Fragment;

use crate::compiler::{BuildContext, Compiler};
use crate::error::SchemaError;
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_str, Keyword, Validate};
use crate::nodes::RefSlot;
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct RefValidator {
    pub(crate) slot: RefSlot,
    pub(crate) path: SchemaLocation,
}

impl RefValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "$ref"
    }
}

impl Validate for RefValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        match cx.arena().target(self.slot) {
            Some(target) => cx.evaluate_branch(target, instance, path, scope),
            None => true,
        }
    }
}

pub(crate) struct DynamicRefValidator {
    slot: RefSlot,
    /// Plain-name fragment, when dynamic-scope lookup may engage.
    anchor: Option<Box<str>>,
    pub(crate) path: SchemaLocation,
}

impl DynamicRefValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "$dynamicRef"
    }
}

impl Validate for DynamicRefValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let Some(static_target) = cx.arena().target(self.slot) else {
            return true;
        };
        let mut target = static_target;
        if let Some(anchor) = &self.anchor {
            // Bookending: dynamic scoping engages only when the reference
            // statically lands on a matching `$dynamicAnchor`.
            let bookended = cx
                .arena()
                .node(static_target)
                .dynamic_anchor
                .as_deref()
                .is_some_and(|name| name == anchor.as_ref());
            if bookended {
                if let Some(dynamic) = cx.lookup_dynamic_anchor(anchor) {
                    target = dynamic;
                }
            }
        }
        cx.evaluate_branch(target, instance, path, scope)
    }
}

pub(crate) struct RecursiveRefValidator {
    slot: RefSlot,
    pub(crate) path: SchemaLocation,
}

impl RecursiveRefValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "$recursiveRef"
    }
}

impl Validate for RecursiveRefValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let Some(static_target) = cx.arena().target(self.slot) else {
            return true;
        };
        let mut target = static_target;
        // Single-slot scope: the outermost `$recursiveAnchor: true` wins,
        // provided the static target is itself an anchor.
        if cx.arena().node(static_target).recursive_anchor {
            if let Some(base) = cx.recursive_base() {
                target = base;
            }
        }
        cx.evaluate_branch(target, instance, path, scope)
    }
}

pub(crate) fn compile_ref(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let reference = expect_str(schema, "$ref")?;
    let target = ctx.resolve(reference)?;
    let slot = compiler.reference_slot(target.as_str())?;
    Ok(Some(Keyword::Ref(RefValidator {
        slot,
        path: ctx.keyword_location("$ref"),
    })))
}

pub(crate) fn compile_dynamic_ref(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let reference = expect_str(schema, "$dynamicRef")?;
    let target = ctx.resolve(reference)?;
    let anchor = match Fragment::of(target.as_str()) {
        Fragment::Anchor(name) => Some(name.into_boxed_str()),
        _ => None,
    };
    let slot = compiler.reference_slot(target.as_str())?;
    Ok(Some(Keyword::DynamicRef(DynamicRefValidator {
        slot,
        anchor,
        path: ctx.keyword_location("$dynamicRef"),
    })))
}

pub(crate) fn compile_recursive_ref(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let reference = expect_str(schema, "$recursiveRef")?;
    let target = ctx.resolve(reference)?;
    let slot = compiler.reference_slot(target.as_str())?;
    Ok(Some(Keyword::RecursiveRef(RecursiveRefValidator {
        slot,
        path: ctx.keyword_location("$recursiveRef"),
    })))
}
