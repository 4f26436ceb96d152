//! Object shape keywords: `required`, `minProperties`, `maxProperties`.
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_array, expect_str, expect_u64, Keyword, Validate};
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct RequiredValidator {
    required: Vec<String>,
    pub(crate) path: SchemaLocation,
}

impl RequiredValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "required"
    }
}

impl Validate for RequiredValidator {
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
        for name in &self.required {
            if !object.contains_key(name) {
                valid = false;
                cx.report(ValidationMessage::new(
                    &self.path,
                    self.keyword(),
                    path,
                    format!("required property '{name}' not found"),
                ));
            }
        }
        valid
    }
}

pub(crate) struct MinPropertiesValidator {
    limit: u64,
    pub(crate) path: SchemaLocation,
}

impl MinPropertiesValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "minProperties"
    }
}

impl Validate for MinPropertiesValidator {
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
        if object.len() as u64 >= self.limit {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!(
                "expected at least {} properties, found {}",
                self.limit,
                object.len()
            ),
        ));
        false
    }
}

pub(crate) struct MaxPropertiesValidator {
    limit: u64,
    pub(crate) path: SchemaLocation,
}

impl MaxPropertiesValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "maxProperties"
    }
}

impl Validate for MaxPropertiesValidator {
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
        if object.len() as u64 <= self.limit {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!(
                "expected at most {} properties, found {}",
                self.limit,
                object.len()
            ),
        ));
        false
    }
}

pub(crate) fn required_names(schema: &Value) -> Result<Vec<String>, SchemaError> {
    expect_array(schema, "required")?
        .iter()
        .map(|name| Ok(expect_str(name, "required")?.to_owned()))
        .collect()
}

pub(crate) fn compile_required(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::Required(RequiredValidator {
        required: required_names(schema)?,
        path: ctx.keyword_location("required"),
    })))
}

pub(crate) fn compile_min_properties(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::MinProperties(MinPropertiesValidator {
        limit: expect_u64(schema, "minProperties")?,
        path: ctx.keyword_location("minProperties"),
    })))
}

pub(crate) fn compile_max_properties(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::MaxProperties(MaxPropertiesValidator {
        limit: expect_u64(schema, "maxProperties")?,
        path: ctx.keyword_location("maxProperties"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"required": ["a"]}), json!({"a": 1}), true)]
    #[test_case(json!({"required": ["a", "b"]}), json!({"a": 1}), false)]
    #[test_case(json!({"required": ["a"]}), json!([]), true; "non objects pass")]
    #[test_case(json!({"minProperties": 1}), json!({}), false)]
    #[test_case(json!({"maxProperties": 1}), json!({"a": 1, "b": 2}), false)]
    fn object_constraints(schema: serde_json::Value, instance: serde_json::Value, expected: bool) {
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test]
    fn one_message_per_missing_property() {
        let schema = json!({"required": ["a", "b", "c"]});
        let validator = crate::compile(&schema).expect("valid schema");
        let mut messages = Vec::new();
        validator.validate(&json!({"b": 1}), &mut messages);
        let missing: Vec<_> = messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(
            missing,
            vec![
                "required property 'a' not found",
                "required property 'c' not found"
            ]
        );
    }
}
