//! Numeric range and divisibility keywords.
//!
//! `minimum`/`maximum` compare by numeric value regardless of how the number
//! is stored. Draft 4 expresses exclusivity through boolean sibling keywords;
//! draft 6 onwards through standalone numeric `exclusiveMinimum`/`Maximum` —
//! both compile into the same validators with an exclusivity flag.
use std::cmp::Ordering;

use serde_json::{Map, Number, Value};

use jschema_scope::Draft;

use crate::compiler::{BuildContext, Compiler};
use crate::equality::{self, Divisibility};
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{Keyword, Validate};
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct MinimumValidator {
    limit: Number,
    exclusive: bool,
    keyword: &'static str,
    pub(crate) path: SchemaLocation,
}

impl MinimumValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        self.keyword
    }
}

impl Validate for MinimumValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        let Value::Number(number) = instance else {
            return true;
        };
        let ordering = equality::compare(number, &self.limit);
        let valid = match ordering {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => !self.exclusive,
            _ => false,
        };
        if !valid {
            let relation = if self.exclusive { "greater than" } else { "at least" };
            cx.report(ValidationMessage::new(
                &self.path,
                self.keyword,
                path,
                format!("{number} must be {relation} {}", self.limit),
            ));
        }
        valid
    }
}

pub(crate) struct MaximumValidator {
    limit: Number,
    exclusive: bool,
    keyword: &'static str,
    pub(crate) path: SchemaLocation,
}

impl MaximumValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        self.keyword
    }
}

impl Validate for MaximumValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        let Value::Number(number) = instance else {
            return true;
        };
        let ordering = equality::compare(number, &self.limit);
        let valid = match ordering {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => !self.exclusive,
            _ => false,
        };
        if !valid {
            let relation = if self.exclusive { "less than" } else { "at most" };
            cx.report(ValidationMessage::new(
                &self.path,
                self.keyword,
                path,
                format!("{number} must be {relation} {}", self.limit),
            ));
        }
        valid
    }
}

pub(crate) struct MultipleOfValidator {
    factor: Number,
    pub(crate) path: SchemaLocation,
}

impl MultipleOfValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "multipleOf"
    }
}

impl Validate for MultipleOfValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        let Value::Number(number) = instance else {
            return true;
        };
        match equality::is_multiple_of(number, &self.factor) {
            Divisibility::Multiple => true,
            Divisibility::NotMultiple => {
                cx.report(ValidationMessage::new(
                    &self.path,
                    self.keyword(),
                    path,
                    format!("{number} is not a multiple of {}", self.factor),
                ));
                false
            }
            Divisibility::PrecisionLoss => {
                cx.report(ValidationMessage::new(
                    &self.path,
                    self.keyword(),
                    path,
                    format!(
                        "cannot determine whether {number} is a multiple of {} within double precision",
                        self.factor
                    ),
                ));
                false
            }
        }
    }
}

fn expect_number(value: &Value, keyword: &'static str) -> Result<Number, SchemaError> {
    value
        .as_number()
        .cloned()
        .ok_or(SchemaError::InvalidKeywordShape {
            keyword,
            expected: "a number",
        })
}

/// Reads the draft 4 boolean exclusivity sibling.
fn draft4_exclusive(
    parent: &Map<String, Value>,
    sibling: &'static str,
) -> Result<bool, SchemaError> {
    match parent.get(sibling) {
        None => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(SchemaError::InvalidKeywordShape {
            keyword: sibling,
            expected: "a boolean in draft 4",
        }),
    }
}

pub(crate) fn compile_minimum(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let exclusive = if ctx.draft() == Draft::Draft4 {
        draft4_exclusive(parent, "exclusiveMinimum")?
    } else {
        false
    };
    Ok(Some(Keyword::Minimum(MinimumValidator {
        limit: expect_number(schema, "minimum")?,
        exclusive,
        keyword: "minimum",
        path: ctx.keyword_location("minimum"),
    })))
}

pub(crate) fn compile_maximum(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let exclusive = if ctx.draft() == Draft::Draft4 {
        draft4_exclusive(parent, "exclusiveMaximum")?
    } else {
        false
    };
    Ok(Some(Keyword::Maximum(MaximumValidator {
        limit: expect_number(schema, "maximum")?,
        exclusive,
        keyword: "maximum",
        path: ctx.keyword_location("maximum"),
    })))
}

pub(crate) fn compile_exclusive_minimum(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    if ctx.draft() == Draft::Draft4 {
        // Boolean modifier, folded into `minimum` above; the shape check
        // still applies when the bound itself is absent.
        if !schema.is_boolean() {
            return Err(SchemaError::InvalidKeywordShape {
                keyword: "exclusiveMinimum",
                expected: "a boolean in draft 4",
            });
        }
        return Ok(None);
    }
    Ok(Some(Keyword::Minimum(MinimumValidator {
        limit: expect_number(schema, "exclusiveMinimum")?,
        exclusive: true,
        keyword: "exclusiveMinimum",
        path: ctx.keyword_location("exclusiveMinimum"),
    })))
}

pub(crate) fn compile_exclusive_maximum(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    if ctx.draft() == Draft::Draft4 {
        if !schema.is_boolean() {
            return Err(SchemaError::InvalidKeywordShape {
                keyword: "exclusiveMaximum",
                expected: "a boolean in draft 4",
            });
        }
        return Ok(None);
    }
    Ok(Some(Keyword::Maximum(MaximumValidator {
        limit: expect_number(schema, "exclusiveMaximum")?,
        exclusive: true,
        keyword: "exclusiveMaximum",
        path: ctx.keyword_location("exclusiveMaximum"),
    })))
}

pub(crate) fn compile_multiple_of(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::MultipleOf(MultipleOfValidator {
        factor: expect_number(schema, "multipleOf")?,
        path: ctx.keyword_location("multipleOf"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"minimum": 5}), json!(5), true)]
    #[test_case(json!({"minimum": 5}), json!(5.0), true; "equal across representations")]
    #[test_case(json!({"minimum": 5}), json!(4.9), false)]
    #[test_case(json!({"exclusiveMinimum": 5}), json!(5), false)]
    #[test_case(json!({"exclusiveMinimum": 5}), json!(5.1), true)]
    #[test_case(json!({"maximum": 2.5}), json!(2), true)]
    #[test_case(json!({"maximum": 2.5}), json!(3), false)]
    #[test_case(json!({"exclusiveMaximum": 2.5}), json!(2.5), false)]
    #[test_case(json!({"multipleOf": 2}), json!(8), true)]
    #[test_case(json!({"multipleOf": 2}), json!(7), false)]
    #[test_case(json!({"multipleOf": 0.5}), json!(2.5), true)]
    #[test_case(json!({"minimum": 5}), json!("5"), true; "non numbers pass")]
    fn ranges(schema: serde_json::Value, instance: serde_json::Value, expected: bool) {
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test]
    fn draft4_boolean_exclusivity() {
        let schema = json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "minimum": 5,
            "exclusiveMinimum": true
        });
        let validator = crate::compile(&schema).expect("valid schema");
        assert!(!validator.is_valid(&json!(5)));
        assert!(validator.is_valid(&json!(6)));
    }

    #[test]
    fn precision_loss_is_reported_not_passed() {
        let schema = json!({"multipleOf": 0.5});
        let validator = crate::compile(&schema).expect("valid schema");
        let huge = json!(9_007_199_254_740_993_i64);
        let mut messages = Vec::new();
        assert!(!validator.validate(&huge, &mut messages));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].message.contains("double precision"));
    }

    #[test]
    fn draft6_rejects_boolean_exclusive_minimum() {
        assert!(crate::compile(&json!({"exclusiveMinimum": true})).is_err());
    }

    #[test]
    fn draft4_modifier_shape_is_checked_without_its_bound() {
        let malformed = json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "exclusiveMinimum": "not-a-bool"
        });
        assert!(crate::compile(&malformed).is_err());

        // A dangling boolean modifier is well-formed, just inert.
        let inert = json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "exclusiveMaximum": true
        });
        let validator = crate::compile(&inert).expect("valid schema");
        assert!(validator.is_valid(&json!(100)));
    }
}
