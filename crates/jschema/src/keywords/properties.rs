//! Object property applicators: `properties`, `patternProperties`,
//! `additionalProperties`, `propertyNames`.
//!
//! Property names examined with a passing subschema are marked evaluated in
//! the surrounding scope; `additionalProperties` only looks at names that
//! neither `properties` nor a `patternProperties` pattern addresses.
use ahash::AHashSet;
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::ecma;
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_object, Keyword, Validate};
use crate::nodes::SchemaNodeId;
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct PropertiesValidator {
    properties: Vec<(String, SchemaNodeId)>,
    pub(crate) path: SchemaLocation,
}

impl PropertiesValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "properties"
    }
}

impl Validate for PropertiesValidator {
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
        let mut valid = true;
        for (name, node) in &self.properties {
            if let Some(value) = object.get(name) {
                let property_path = path.push_property(name);
                let mut child_scope = Scope::new();
                if cx.evaluate_node(*node, value, &property_path, &mut child_scope) {
                    scope.mark_property(name);
                } else {
                    valid = false;
                }
            } else if cx.patch_enabled() {
                // A missing property with a default becomes a patch
                // operation and counts as present for this node's sweep.
                if let Some(default) = cx.arena().default_value(*node) {
                    let pointer = path.push_property(name).to_pointer();
                    cx.emit_default(pointer, default);
                    scope.mark_property(name);
                }
            }
        }
        valid
    }
}

pub(crate) struct PatternPropertiesValidator {
    patterns: Vec<(String, fancy_regex::Regex, SchemaNodeId)>,
    pub(crate) path: SchemaLocation,
}

impl PatternPropertiesValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "patternProperties"
    }
}

impl Validate for PatternPropertiesValidator {
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
        let mut valid = true;
        for (_, regex, node) in &self.patterns {
            for (name, value) in object {
                if !regex.is_match(name).unwrap_or(false) {
                    continue;
                }
                let property_path = path.push_property(name);
                let mut child_scope = Scope::new();
                if cx.evaluate_node(*node, value, &property_path, &mut child_scope) {
                    scope.mark_property(name);
                } else {
                    valid = false;
                }
            }
        }
        valid
    }
}

pub(crate) struct AdditionalPropertiesValidator {
    node: SchemaNodeId,
    /// Names addressed by the sibling `properties`.
    named: AHashSet<String>,
    /// Patterns of the sibling `patternProperties`.
    patterns: Vec<fancy_regex::Regex>,
    pub(crate) path: SchemaLocation,
}

impl AdditionalPropertiesValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "additionalProperties"
    }

    fn is_addressed(&self, name: &str) -> bool {
        self.named.contains(name)
            || self
                .patterns
                .iter()
                .any(|regex| regex.is_match(name).unwrap_or(false))
    }
}

impl Validate for AdditionalPropertiesValidator {
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
            if self.is_addressed(name) {
                continue;
            }
            let property_path = path.push_property(name);
            if forbids_everything {
                valid = false;
                cx.report(ValidationMessage::new(
                    &self.path,
                    self.keyword(),
                    &property_path,
                    format!("additional property '{name}' is not permitted"),
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

pub(crate) struct PropertyNamesValidator {
    node: SchemaNodeId,
    pub(crate) path: SchemaLocation,
}

impl PropertyNamesValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "propertyNames"
    }
}

impl Validate for PropertyNamesValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        let Value::Object(object) = instance else {
            return true;
        };
        let mut valid = true;
        for name in object.keys() {
            let name_value = Value::String(name.clone());
            let property_path = path.push_property(name);
            let mut child_scope = Scope::new();
            if !cx.evaluate_node(self.node, &name_value, &property_path, &mut child_scope) {
                valid = false;
            }
        }
        valid
    }
}

pub(crate) fn compile_properties(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let members = expect_object(schema, "properties")?;
    let base = ctx.with_keyword("properties");
    let mut properties = Vec::with_capacity(members.len());
    for (name, subschema) in members {
        let node = compiler.compile_schema(&base.with_keyword(name), subschema)?;
        properties.push((name.clone(), node));
    }
    Ok(Some(Keyword::Properties(PropertiesValidator {
        properties,
        path: ctx.keyword_location("properties"),
    })))
}

fn compiled_patterns(
    members: &Map<String, Value>,
) -> Result<Vec<(String, fancy_regex::Regex)>, SchemaError> {
    members
        .keys()
        .map(|pattern| {
            let regex =
                ecma::compile_regex(pattern).map_err(|error| SchemaError::InvalidRegex {
                    pattern: pattern.clone(),
                    reason: error.to_string(),
                })?;
            Ok((pattern.clone(), regex))
        })
        .collect()
}

pub(crate) fn compile_pattern_properties(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let members = expect_object(schema, "patternProperties")?;
    let base = ctx.with_keyword("patternProperties");
    let mut patterns = Vec::with_capacity(members.len());
    for ((pattern, regex), subschema) in compiled_patterns(members)?.into_iter().zip(members.values())
    {
        let node = compiler.compile_schema(&base.with_keyword(&pattern), subschema)?;
        patterns.push((pattern, regex, node));
    }
    Ok(Some(Keyword::PatternProperties(PatternPropertiesValidator {
        patterns,
        path: ctx.keyword_location("patternProperties"),
    })))
}

pub(crate) fn compile_additional_properties(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let node = compiler.compile_schema(&ctx.with_keyword("additionalProperties"), schema)?;
    let named = parent
        .get("properties")
        .and_then(Value::as_object)
        .map(|members| members.keys().cloned().collect::<AHashSet<_>>())
        .unwrap_or_default();
    let patterns = parent
        .get("patternProperties")
        .and_then(Value::as_object)
        .map(|members| compiled_patterns(members))
        .transpose()?
        .unwrap_or_default()
        .into_iter()
        .map(|(_, regex)| regex)
        .collect();
    Ok(Some(Keyword::AdditionalProperties(
        AdditionalPropertiesValidator {
            node,
            named,
            patterns,
            path: ctx.keyword_location("additionalProperties"),
        },
    )))
}

pub(crate) fn compile_property_names(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let node = compiler.compile_schema(&ctx.with_keyword("propertyNames"), schema)?;
    Ok(Some(Keyword::PropertyNames(PropertyNamesValidator {
        node,
        path: ctx.keyword_location("propertyNames"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"properties": {"a": {"type": "integer"}}}), json!({"a": 1}), true)]
    #[test_case(json!({"properties": {"a": {"type": "integer"}}}), json!({"a": "1"}), false)]
    #[test_case(json!({"properties": {"a": {"type": "integer"}}}), json!({"b": "x"}), true; "absent properties pass")]
    #[test_case(json!({"patternProperties": {"^x-": {"type": "string"}}}), json!({"x-h": "v"}), true)]
    #[test_case(json!({"patternProperties": {"^x-": {"type": "string"}}}), json!({"x-h": 1}), false)]
    #[test_case(json!({"properties": {"a": {}}, "additionalProperties": false}), json!({"a": 1}), true)]
    #[test_case(json!({"properties": {"a": {}}, "additionalProperties": false}), json!({"a": 1, "b": 2}), false)]
    #[test_case(
        json!({"patternProperties": {"^x-": {}}, "additionalProperties": false}),
        json!({"x-h": 1}),
        true;
        "pattern addressed names are not additional"
    )]
    #[test_case(json!({"additionalProperties": {"type": "number"}}), json!({"a": 1, "b": 2.5}), true)]
    #[test_case(json!({"additionalProperties": {"type": "number"}}), json!({"a": "x"}), false)]
    #[test_case(json!({"propertyNames": {"maxLength": 3}}), json!({"abc": 1}), true)]
    #[test_case(json!({"propertyNames": {"maxLength": 3}}), json!({"abcd": 1}), false)]
    fn property_applicators(
        schema: serde_json::Value,
        instance: serde_json::Value,
        expected: bool,
    ) {
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test]
    fn additional_property_message_points_at_the_property() {
        let schema = json!({"properties": {"a": {}}, "additionalProperties": false});
        let validator = crate::compile(&schema).expect("valid schema");
        let mut messages = Vec::new();
        validator.validate(&json!({"a": 1, "extra": 2}), &mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].instance_location, "/extra");
        assert_eq!(messages[0].keyword, "additionalProperties");
    }
}
