//! The `type` keyword.
use std::fmt;

use serde_json::{Map, Value};

use jschema_scope::Draft;

use crate::compiler::{BuildContext, Compiler};
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_str, Keyword, Validate};
use crate::paths::{InstancePath, SchemaLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JsonType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    Integer,
}

impl JsonType {
    fn parse(name: &str, keyword: &'static str) -> Result<JsonType, SchemaError> {
        match name {
            "null" => Ok(JsonType::Null),
            "boolean" => Ok(JsonType::Boolean),
            "object" => Ok(JsonType::Object),
            "array" => Ok(JsonType::Array),
            "number" => Ok(JsonType::Number),
            "string" => Ok(JsonType::String),
            "integer" => Ok(JsonType::Integer),
            _ => Err(SchemaError::InvalidKeywordShape {
                keyword,
                expected: "a JSON type name",
            }),
        }
    }

    /// The primitive type of an instance, for messages.
    pub(crate) fn of(instance: &Value) -> JsonType {
        match instance {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Integer => "integer",
        };
        f.write_str(name)
    }
}

pub(crate) struct TypeValidator {
    types: Vec<JsonType>,
    /// Draft 4 excludes floats with a zero fraction from `integer`.
    strict_integer: bool,
    pub(crate) path: SchemaLocation,
}

impl TypeValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "type"
    }

    fn matches(&self, instance: &Value) -> bool {
        self.types.iter().any(|expected| match expected {
            JsonType::Null => instance.is_null(),
            JsonType::Boolean => instance.is_boolean(),
            JsonType::Object => instance.is_object(),
            JsonType::Array => instance.is_array(),
            JsonType::String => instance.is_string(),
            JsonType::Number => instance.is_number(),
            JsonType::Integer => match instance {
                Value::Number(number) => {
                    number.is_u64()
                        || number.is_i64()
                        || (!self.strict_integer
                            && number.as_f64().is_some_and(|float| float.fract() == 0.0))
                }
                _ => false,
            },
        })
    }
}

impl Validate for TypeValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        if self.matches(instance) {
            return true;
        }
        let expected = self
            .types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!("expected {expected}, found {}", JsonType::of(instance)),
        ));
        false
    }
}

pub(crate) fn compile(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let types = match schema {
        Value::String(name) => vec![JsonType::parse(name, "type")?],
        Value::Array(names) => names
            .iter()
            .map(|name| JsonType::parse(expect_str(name, "type")?, "type"))
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(SchemaError::InvalidKeywordShape {
                keyword: "type",
                expected: "a type name or an array of type names",
            })
        }
    };
    Ok(Some(Keyword::Type(TypeValidator {
        types,
        strict_integer: ctx.draft() == Draft::Draft4,
        path: ctx.keyword_location("type"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"type": "integer"}), json!(1), true)]
    #[test_case(json!({"type": "integer"}), json!(1.0), true; "zero fraction float is integer")]
    #[test_case(json!({"type": "integer"}), json!(1.5), false)]
    #[test_case(json!({"type": "number"}), json!(1), true)]
    #[test_case(json!({"type": ["string", "null"]}), json!(null), true)]
    #[test_case(json!({"type": ["string", "null"]}), json!(0), false)]
    fn type_matching(schema: serde_json::Value, instance: serde_json::Value, expected: bool) {
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test]
    fn draft4_integer_excludes_floats() {
        let schema = json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "type": "integer"
        });
        let validator = crate::compile(&schema).expect("valid schema");
        assert!(validator.is_valid(&json!(1)));
        assert!(!validator.is_valid(&json!(1.0)));
    }

    #[test]
    fn message_carries_both_locations() {
        let schema = json!({"properties": {"flag": {"type": "boolean"}}});
        let validator = crate::compile(&schema).expect("valid schema");
        let mut messages = Vec::new();
        validator.validate(&json!({"flag": "false"}), &mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].instance_location, "/flag");
        assert_eq!(messages[0].keyword, "type");
        assert!(messages[0].schema_location.ends_with("#/properties/flag/type"));
    }
}
