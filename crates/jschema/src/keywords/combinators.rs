//! `allOf`, `anyOf`, `oneOf`, `not`.
//!
//! `allOf` streams branch errors directly; the other three evaluate branches
//! with errors captured, because a failing branch is not by itself an
//! instance failure. A branch's evaluated properties/items are unioned into
//! the surrounding scope only when the branch passes.
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_array, Keyword, Validate};
use crate::nodes::SchemaNodeId;
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct AllOfValidator {
    branches: Vec<SchemaNodeId>,
    pub(crate) path: SchemaLocation,
}

impl AllOfValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "allOf"
    }
}

impl Validate for AllOfValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let mut valid = true;
        for branch in &self.branches {
            if !cx.evaluate_branch(*branch, instance, path, scope) {
                valid = false;
            }
        }
        valid
    }
}

pub(crate) struct AnyOfValidator {
    branches: Vec<SchemaNodeId>,
    pub(crate) path: SchemaLocation,
}

impl AnyOfValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "anyOf"
    }
}

impl Validate for AnyOfValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let mut nested = Vec::new();
        let mut matched = false;
        for branch in &self.branches {
            let probe = cx.probe_node(*branch, instance, path);
            if probe.valid {
                scope.absorb(probe.scope);
                matched = true;
                // Trace sinks want every branch on record.
                if !cx.exhaustive_branches() {
                    return true;
                }
            } else {
                nested.extend(probe.messages);
            }
        }
        if matched {
            return true;
        }
        cx.report(
            ValidationMessage::new(
                &self.path,
                self.keyword(),
                path,
                "no branch matched".to_owned(),
            )
            .nested(nested),
        );
        false
    }
}

pub(crate) struct OneOfValidator {
    branches: Vec<SchemaNodeId>,
    pub(crate) path: SchemaLocation,
}

impl OneOfValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "oneOf"
    }
}

impl Validate for OneOfValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let mut matches = Vec::new();
        let mut nested = Vec::new();
        let mut matched_scope = None;
        // Every branch runs: "exactly one" cannot short-circuit.
        for (index, branch) in self.branches.iter().enumerate() {
            let probe = cx.probe_node(*branch, instance, path);
            if probe.valid {
                matches.push(index);
                matched_scope = Some(probe.scope);
            } else {
                nested.extend(probe.messages);
            }
        }
        match matches.as_slice() {
            [_] => {
                if let Some(branch_scope) = matched_scope {
                    scope.absorb(branch_scope);
                }
                true
            }
            [] => {
                cx.report(
                    ValidationMessage::new(
                        &self.path,
                        self.keyword(),
                        path,
                        "no branch matched".to_owned(),
                    )
                    .nested(nested),
                );
                false
            }
            indices => {
                let listed = indices
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                cx.report(ValidationMessage::new(
                    &self.path,
                    self.keyword(),
                    path,
                    format!("multiple branches matched: {listed}"),
                ));
                false
            }
        }
    }
}

pub(crate) struct NotValidator {
    node: SchemaNodeId,
    pub(crate) path: SchemaLocation,
}

impl NotValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "not"
    }
}

impl Validate for NotValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        // Errors from inside `not` are suppressed either way.
        let probe = cx.probe_node(self.node, instance, path);
        if !probe.valid {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            "must not be valid against the subschema".to_owned(),
        ));
        false
    }
}

fn compile_branches(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    schema: &Value,
    keyword: &'static str,
) -> Result<Vec<SchemaNodeId>, SchemaError> {
    let branches = expect_array(schema, keyword)?;
    let ctx = ctx.with_keyword(keyword);
    branches
        .iter()
        .enumerate()
        .map(|(index, branch)| compiler.compile_schema(&ctx.with_index(index), branch))
        .collect()
}

pub(crate) fn compile_all_of(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::AllOf(AllOfValidator {
        branches: compile_branches(compiler, ctx, schema, "allOf")?,
        path: ctx.keyword_location("allOf"),
    })))
}

pub(crate) fn compile_any_of(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::AnyOf(AnyOfValidator {
        branches: compile_branches(compiler, ctx, schema, "anyOf")?,
        path: ctx.keyword_location("anyOf"),
    })))
}

pub(crate) fn compile_one_of(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::OneOf(OneOfValidator {
        branches: compile_branches(compiler, ctx, schema, "oneOf")?,
        path: ctx.keyword_location("oneOf"),
    })))
}

pub(crate) fn compile_not(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let node = compiler.compile_schema(&ctx.with_keyword("not"), schema)?;
    Ok(Some(Keyword::Not(NotValidator {
        node,
        path: ctx.keyword_location("not"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"allOf": [{"type": "string"}, {"minLength": 2}]}), json!("ab"), true)]
    #[test_case(json!({"allOf": [{"type": "string"}, {"minLength": 2}]}), json!("a"), false)]
    #[test_case(json!({"anyOf": [{"type": "string"}, {"minimum": 5}]}), json!(7), true)]
    #[test_case(json!({"anyOf": [{"type": "string"}, {"minimum": 5}]}), json!(2), false)]
    #[test_case(json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]}), json!(1), true)]
    #[test_case(json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]}), json!(2.5), true)]
    #[test_case(json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]}), json!(3), false; "both branches match")]
    #[test_case(json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]}), json!(1.5), false; "no branch matches")]
    #[test_case(json!({"not": {"type": "string"}}), json!(5), true)]
    #[test_case(json!({"not": {"type": "string"}}), json!("x"), false)]
    fn combinators(schema: serde_json::Value, instance: serde_json::Value, expected: bool) {
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test]
    fn one_of_reports_matching_indices() {
        let schema = json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]});
        let validator = crate::compile(&schema).expect("valid schema");
        let mut messages = Vec::new();
        validator.validate(&json!(3), &mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "multiple branches matched: 0, 1");
    }

    #[test]
    fn not_suppresses_inner_errors() {
        let schema = json!({"not": {"type": "string", "minLength": 100}});
        let validator = crate::compile(&schema).expect("valid schema");
        let mut messages = Vec::new();
        validator.validate(&json!(5), &mut messages);
        // The inner type failure stays internal; `not` itself passes.
        assert!(messages.is_empty());
    }
}
