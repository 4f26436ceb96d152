//! String keywords: `minLength`, `maxLength`, `pattern`.
//!
//! Lengths count Unicode code points, not bytes. Patterns are ECMA-262 and an
//! unanchored match anywhere in the string satisfies `pattern`.
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::ecma;
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_str, expect_u64, Keyword, Validate};
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct MinLengthValidator {
    limit: u64,
    pub(crate) path: SchemaLocation,
}

impl MinLengthValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "minLength"
    }
}

impl Validate for MinLengthValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        let Value::String(text) = instance else {
            return true;
        };
        let length = text.chars().count() as u64;
        if length >= self.limit {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!(
                "expected a string of at least {} characters, found {length}",
                self.limit
            ),
        ));
        false
    }
}

pub(crate) struct MaxLengthValidator {
    limit: u64,
    pub(crate) path: SchemaLocation,
}

impl MaxLengthValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "maxLength"
    }
}

impl Validate for MaxLengthValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        let Value::String(text) = instance else {
            return true;
        };
        let length = text.chars().count() as u64;
        if length <= self.limit {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!(
                "expected a string of at most {} characters, found {length}",
                self.limit
            ),
        ));
        false
    }
}

pub(crate) struct PatternValidator {
    regex: fancy_regex::Regex,
    pattern: String,
    pub(crate) path: SchemaLocation,
}

impl PatternValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "pattern"
    }
}

impl Validate for PatternValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        let Value::String(text) = instance else {
            return true;
        };
        if self.regex.is_match(text).unwrap_or(false) {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!("does not match pattern {:?}", self.pattern),
        ));
        false
    }
}

pub(crate) fn compile_min_length(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::MinLength(MinLengthValidator {
        limit: expect_u64(schema, "minLength")?,
        path: ctx.keyword_location("minLength"),
    })))
}

pub(crate) fn compile_max_length(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::MaxLength(MaxLengthValidator {
        limit: expect_u64(schema, "maxLength")?,
        path: ctx.keyword_location("maxLength"),
    })))
}

pub(crate) fn compile_pattern(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let pattern = expect_str(schema, "pattern")?;
    let regex = ecma::compile_regex(pattern).map_err(|error| SchemaError::InvalidRegex {
        pattern: pattern.to_owned(),
        reason: error.to_string(),
    })?;
    Ok(Some(Keyword::Pattern(PatternValidator {
        regex,
        pattern: pattern.to_owned(),
        path: ctx.keyword_location("pattern"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"minLength": 3}), json!("abc"), true)]
    #[test_case(json!({"minLength": 3}), json!("ab"), false)]
    #[test_case(json!({"minLength": 3}), json!("äöü"), true; "code points not bytes")]
    #[test_case(json!({"maxLength": 2}), json!("ab"), true)]
    #[test_case(json!({"maxLength": 2}), json!("abc"), false)]
    #[test_case(json!({"maxLength": 2}), json!(123), true; "non strings pass")]
    #[test_case(json!({"pattern": "^f"}), json!("foo"), true)]
    #[test_case(json!({"pattern": "^f"}), json!("bar"), false)]
    #[test_case(json!({"pattern": "oo"}), json!("foo"), true; "unanchored substring match")]
    fn string_constraints(schema: serde_json::Value, instance: serde_json::Value, expected: bool) {
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test]
    fn invalid_pattern_is_a_schema_error() {
        let error = crate::compile(&json!({"pattern": "(unclosed"})).unwrap_err();
        assert!(matches!(error, crate::SchemaError::InvalidRegex { .. }));
    }

    #[test]
    fn negative_length_is_a_schema_error() {
        assert!(crate::compile(&json!({"maxLength": -1})).is_err());
        assert!(crate::compile(&json!({"maxLength": "3"})).is_err());
    }
}
