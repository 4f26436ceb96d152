//! `if` / `then` / `else`.
//!
//! The condition runs with errors captured; whichever arm is selected runs
//! like an `allOf` branch. A passing condition contributes its evaluations to
//! the scope, so `unevaluatedProperties` sees what `if` examined.
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::error::SchemaError;
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{Keyword, Validate};
use crate::nodes::SchemaNodeId;
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct IfThenElseValidator {
    condition: SchemaNodeId,
    then_branch: Option<SchemaNodeId>,
    else_branch: Option<SchemaNodeId>,
    pub(crate) path: SchemaLocation,
}

impl IfThenElseValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "if"
    }
}

impl Validate for IfThenElseValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let probe = cx.probe_node(self.condition, instance, path);
        if probe.valid {
            scope.absorb(probe.scope);
            match self.then_branch {
                Some(branch) => cx.evaluate_branch(branch, instance, path, scope),
                None => true,
            }
        } else {
            match self.else_branch {
                Some(branch) => cx.evaluate_branch(branch, instance, path, scope),
                None => true,
            }
        }
    }
}

pub(crate) fn compile(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let condition = compiler.compile_schema(&ctx.with_keyword("if"), schema)?;
    let then_branch = parent
        .get("then")
        .map(|branch| compiler.compile_schema(&ctx.with_keyword("then"), branch))
        .transpose()?;
    let else_branch = parent
        .get("else")
        .map(|branch| compiler.compile_schema(&ctx.with_keyword("else"), branch))
        .transpose()?;
    Ok(Some(Keyword::IfThenElse(IfThenElseValidator {
        condition,
        then_branch,
        else_branch,
        path: ctx.keyword_location("if"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    fn postal_schema() -> serde_json::Value {
        json!({
            "if": {"properties": {"country": {"const": "US"}}},
            "then": {"properties": {"postal": {"pattern": "^[0-9]{5}$"}}},
            "else": {"properties": {"postal": {"minLength": 3}}}
        })
    }

    #[test_case(json!({"country": "US", "postal": "94105"}), true)]
    #[test_case(json!({"country": "US", "postal": "9410"}), false)]
    #[test_case(json!({"country": "NL", "postal": "1017"}), true)]
    #[test_case(json!({"country": "NL", "postal": "10"}), false)]
    fn conditional(instance: serde_json::Value, expected: bool) {
        let validator = crate::compile(&postal_schema()).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test]
    fn then_without_if_is_inert() {
        let schema = json!({"then": {"type": "string"}});
        let validator = crate::compile(&schema).expect("valid schema");
        assert!(validator.is_valid(&json!(42)));
    }

    #[test]
    fn condition_errors_stay_internal() {
        let validator = crate::compile(&postal_schema()).expect("valid schema");
        let mut messages = Vec::new();
        validator.validate(&json!({"country": "NL", "postal": "10"}), &mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].keyword, "minLength");
        assert_eq!(messages[0].instance_location, "/postal");
    }
}
