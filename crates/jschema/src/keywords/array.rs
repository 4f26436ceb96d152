//! Array size and uniqueness keywords.
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::equality::json_equal;
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_u64, Keyword, Validate};
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct MinItemsValidator {
    limit: u64,
    pub(crate) path: SchemaLocation,
}

impl MinItemsValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "minItems"
    }
}

impl Validate for MinItemsValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        let Value::Array(items) = instance else {
            return true;
        };
        if items.len() as u64 >= self.limit {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!("expected at least {} items, found {}", self.limit, items.len()),
        ));
        false
    }
}

pub(crate) struct MaxItemsValidator {
    limit: u64,
    pub(crate) path: SchemaLocation,
}

impl MaxItemsValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "maxItems"
    }
}

impl Validate for MaxItemsValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        let Value::Array(items) = instance else {
            return true;
        };
        if items.len() as u64 <= self.limit {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!("expected at most {} items, found {}", self.limit, items.len()),
        ));
        false
    }
}

pub(crate) struct UniqueItemsValidator {
    pub(crate) path: SchemaLocation,
}

impl UniqueItemsValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "uniqueItems"
    }
}

impl Validate for UniqueItemsValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        _scope: &mut Scope,
    ) -> bool {
        let Value::Array(items) = instance else {
            return true;
        };
        for (index, item) in items.iter().enumerate() {
            if items[..index].iter().any(|earlier| json_equal(earlier, item)) {
                cx.report(ValidationMessage::new(
                    &self.path,
                    self.keyword(),
                    path,
                    format!("array items are not unique (item {index} duplicates an earlier item)"),
                ));
                return false;
            }
        }
        true
    }
}

pub(crate) fn compile_min_items(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::MinItems(MinItemsValidator {
        limit: expect_u64(schema, "minItems")?,
        path: ctx.keyword_location("minItems"),
    })))
}

pub(crate) fn compile_max_items(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    Ok(Some(Keyword::MaxItems(MaxItemsValidator {
        limit: expect_u64(schema, "maxItems")?,
        path: ctx.keyword_location("maxItems"),
    })))
}

pub(crate) fn compile_unique_items(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    match schema {
        Value::Bool(true) => Ok(Some(Keyword::UniqueItems(UniqueItemsValidator {
            path: ctx.keyword_location("uniqueItems"),
        }))),
        Value::Bool(false) => Ok(None),
        _ => Err(SchemaError::InvalidKeywordShape {
            keyword: "uniqueItems",
            expected: "a boolean",
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"minItems": 2}), json!([1, 2]), true)]
    #[test_case(json!({"minItems": 2}), json!([1]), false)]
    #[test_case(json!({"maxItems": 1}), json!([1, 2]), false)]
    #[test_case(json!({"uniqueItems": true}), json!([1, 2, 3]), true)]
    #[test_case(json!({"uniqueItems": true}), json!([1, 2, 1]), false)]
    #[test_case(json!({"uniqueItems": true}), json!([1, 1.0]), false; "numeric duplicates across representations")]
    #[test_case(json!({"uniqueItems": true}), json!([{"a": 1, "b": 2}, {"b": 2, "a": 1}]), false; "object key order ignored")]
    #[test_case(json!({"uniqueItems": false}), json!([1, 1]), true)]
    fn array_constraints(schema: serde_json::Value, instance: serde_json::Value, expected: bool) {
        let validator = crate::compile(&schema).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }
}
