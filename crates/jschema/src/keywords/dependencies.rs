//! Property dependencies.
//!
//! Draft 4–7 `dependencies` mixes required-name lists and subschemas in one
//! keyword; 2019-09 split it into `dependentRequired` and
//! `dependentSchemas`. The legacy keyword compiles both halves into a single
//! validator.
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_object, object::required_names, Keyword, Validate};
use crate::nodes::SchemaNodeId;
use crate::paths::{InstancePath, SchemaLocation};

fn check_required(
    cx: &mut EvalContext<'_, '_>,
    object: &Map<String, Value>,
    deps: &[(String, Vec<String>)],
    location: &SchemaLocation,
    keyword: &'static str,
    path: &InstancePath<'_>,
) -> bool {
    let mut valid = true;
    for (trigger, names) in deps {
        if !object.contains_key(trigger) {
            continue;
        }
        for name in names {
            if !object.contains_key(name) {
                valid = false;
                cx.report(ValidationMessage::new(
                    location,
                    keyword,
                    path,
                    format!("'{trigger}' requires property '{name}' to be present"),
                ));
            }
        }
    }
    valid
}

fn check_schemas(
    cx: &mut EvalContext<'_, '_>,
    object: &Map<String, Value>,
    deps: &[(String, SchemaNodeId)],
    instance: &Value,
    path: &InstancePath<'_>,
    scope: &mut Scope,
) -> bool {
    let mut valid = true;
    for (trigger, node) in deps {
        if object.contains_key(trigger) && !cx.evaluate_branch(*node, instance, path, scope) {
            valid = false;
        }
    }
    valid
}

/// Legacy mixed `dependencies`.
pub(crate) struct DependenciesValidator {
    required: Vec<(String, Vec<String>)>,
    schemas: Vec<(String, SchemaNodeId)>,
    pub(crate) path: SchemaLocation,
}

impl DependenciesValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "dependencies"
    }
}

impl Validate for DependenciesValidator {
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
        let names_ok = check_required(cx, object, &self.required, &self.path, self.keyword(), path);
        let schemas_ok = check_schemas(cx, object, &self.schemas, instance, path, scope);
        names_ok && schemas_ok
    }
}

pub(crate) struct DependentRequiredValidator {
    required: Vec<(String, Vec<String>)>,
    pub(crate) path: SchemaLocation,
}

impl DependentRequiredValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "dependentRequired"
    }
}

impl Validate for DependentRequiredValidator {
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
        check_required(cx, object, &self.required, &self.path, self.keyword(), path)
    }
}

pub(crate) struct DependentSchemasValidator {
    schemas: Vec<(String, SchemaNodeId)>,
    pub(crate) path: SchemaLocation,
}

impl DependentSchemasValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "dependentSchemas"
    }
}

impl Validate for DependentSchemasValidator {
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
        check_schemas(cx, object, &self.schemas, instance, path, scope)
    }
}

pub(crate) fn compile_dependencies(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let members = expect_object(schema, "dependencies")?;
    let base = ctx.with_keyword("dependencies");
    let mut required = Vec::new();
    let mut schemas = Vec::new();
    for (trigger, dependency) in members {
        match dependency {
            Value::Array(_) => required.push((trigger.clone(), required_names(dependency)?)),
            Value::Object(_) | Value::Bool(_) => {
                let node = compiler.compile_schema(&base.with_keyword(trigger), dependency)?;
                schemas.push((trigger.clone(), node));
            }
            _ => {
                return Err(SchemaError::InvalidKeywordShape {
                    keyword: "dependencies",
                    expected: "an array of names or a schema per property",
                })
            }
        }
    }
    Ok(Some(Keyword::Dependencies(DependenciesValidator {
        required,
        schemas,
        path: ctx.keyword_location("dependencies"),
    })))
}

pub(crate) fn compile_dependent_required(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let members = expect_object(schema, "dependentRequired")?;
    let mut required = Vec::new();
    for (trigger, names) in members {
        required.push((trigger.clone(), required_names(names)?));
    }
    Ok(Some(Keyword::DependentRequired(DependentRequiredValidator {
        required,
        path: ctx.keyword_location("dependentRequired"),
    })))
}

pub(crate) fn compile_dependent_schemas(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let members = expect_object(schema, "dependentSchemas")?;
    let base = ctx.with_keyword("dependentSchemas");
    let mut schemas = Vec::new();
    for (trigger, subschema) in members {
        let node = compiler.compile_schema(&base.with_keyword(trigger), subschema)?;
        schemas.push((trigger.clone(), node));
    }
    Ok(Some(Keyword::DependentSchemas(DependentSchemasValidator {
        schemas,
        path: ctx.keyword_location("dependentSchemas"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    fn draft7_mixed() -> serde_json::Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "dependencies": {
                "credit_card": ["billing_address"],
                "shipping": {"properties": {"address": {"type": "string"}}}
            }
        })
    }

    #[test_case(json!({"credit_card": "4111", "billing_address": "1 Main St"}), true)]
    #[test_case(json!({"credit_card": "4111"}), false; "missing dependent name")]
    #[test_case(json!({"shipping": true, "address": "1 Main St"}), true)]
    #[test_case(json!({"shipping": true, "address": 5}), false; "dependent schema fails")]
    #[test_case(json!({"other": 1}), true; "no trigger present")]
    fn mixed_dependencies(instance: serde_json::Value, expected: bool) {
        let validator = crate::compile(&draft7_mixed()).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test_case(json!({"a": 1, "b": 2}), true)]
    #[test_case(json!({"a": 1}), false)]
    fn dependent_required(instance: serde_json::Value, expected: bool) {
        let schema = json!({"dependentRequired": {"a": ["b"]}});
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test_case(json!({"a": 1, "b": 2}), true)]
    #[test_case(json!({"a": 1, "b": "x"}), false)]
    fn dependent_schemas(instance: serde_json::Value, expected: bool) {
        let schema = json!({"dependentSchemas": {"a": {"properties": {"b": {"type": "integer"}}}}});
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }
}
