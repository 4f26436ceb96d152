//! `const` and `enum`.
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::equality::json_equal;
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_array, Keyword, Validate};
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct ConstValidator {
    value: Value,
    pub(crate) path: SchemaLocation,
}

impl ConstValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "const"
    }
}

impl Validate for ConstValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        if json_equal(instance, &self.value) {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!("expected the constant value {}", self.value),
        ));
        false
    }
}

pub(crate) struct EnumValidator {
    values: Vec<Value>,
    pub(crate) path: SchemaLocation,
}

impl EnumValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "enum"
    }
}

impl Validate for EnumValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        if self.values.iter().any(|value| json_equal(instance, value)) {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            "not one of the enumerated values".to_owned(),
        ));
        false
    }
}

pub(crate) fn compile_const(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::Const(ConstValidator {
        value: schema.clone(),
        path: ctx.keyword_location("const"),
    })))
}

pub(crate) fn compile_enum(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let values = expect_array(schema, "enum")?;
    Ok(Some(Keyword::Enum(EnumValidator {
        values: values.clone(),
        path: ctx.keyword_location("enum"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"const": 1}), json!(1.0), true; "numbers compare by value")]
    #[test_case(json!({"const": {"a": 1}}), json!({"a": 1}), true)]
    #[test_case(json!({"const": "x"}), json!("y"), false)]
    #[test_case(json!({"enum": ["red", "green"]}), json!("green"), true)]
    #[test_case(json!({"enum": ["red", "green"]}), json!("blue"), false)]
    #[test_case(json!({"enum": [0]}), json!(0.0), true)]
    fn literal_matching(schema: serde_json::Value, instance: serde_json::Value, expected: bool) {
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test]
    fn enum_must_be_an_array() {
        assert!(crate::compile(&json!({"enum": "red"})).is_err());
    }
}
