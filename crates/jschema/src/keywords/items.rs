//! Array item applicators: `prefixItems`, `items` in its draft-dependent
//! shapes, `additionalItems`, and `contains` with its 2019-09 bounds.
//!
//! Indices examined with a passing subschema are marked evaluated for
//! `unevaluatedItems`.
use serde_json::{Map, Value};

use jschema_scope::Draft;

use crate::compiler::{BuildContext, Compiler};
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_u64, Keyword, Validate};
use crate::nodes::SchemaNodeId;
use crate::paths::{InstancePath, SchemaLocation};

/// Positional subschemas: 2020-12 `prefixItems` or the array form of `items`
/// in the earlier drafts.
pub(crate) struct PrefixItemsValidator {
    nodes: Vec<SchemaNodeId>,
    keyword: &'static str,
    pub(crate) path: SchemaLocation,
}

impl PrefixItemsValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        self.keyword
    }
}

impl Validate for PrefixItemsValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let Value::Array(items) = instance else {
            return true;
        };
        let mut valid = true;
        for (index, (item, node)) in items.iter().zip(&self.nodes).enumerate() {
            let item_path = path.push_index(index);
            let mut child_scope = Scope::new();
            if cx.evaluate_node(*node, item, &item_path, &mut child_scope) {
                scope.mark_index(index);
            } else {
                valid = false;
            }
        }
        valid
    }
}

/// One schema applied to every item past `skip`: plain `items`, trailing
/// `items` after `prefixItems`, or `additionalItems` after an `items` array.
pub(crate) struct ItemsValidator {
    node: SchemaNodeId,
    skip: usize,
    keyword: &'static str,
    pub(crate) path: SchemaLocation,
}

impl ItemsValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        self.keyword
    }
}

impl Validate for ItemsValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let Value::Array(items) = instance else {
            return true;
        };
        let mut valid = true;
        for (index, item) in items.iter().enumerate().skip(self.skip) {
            let item_path = path.push_index(index);
            let mut child_scope = Scope::new();
            if cx.evaluate_node(self.node, item, &item_path, &mut child_scope) {
                scope.mark_index(index);
            } else {
                valid = false;
            }
        }
        valid
    }
}

pub(crate) struct ContainsValidator {
    node: SchemaNodeId,
    min: u64,
    max: Option<u64>,
    pub(crate) path: SchemaLocation,
}

impl ContainsValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "contains"
    }
}

impl Validate for ContainsValidator {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool {
        let Value::Array(items) = instance else {
            return true;
        };
        let mut count = 0u64;
        for (index, item) in items.iter().enumerate() {
            let item_path = path.push_index(index);
            let probe = cx.probe_node(self.node, item, &item_path);
            if probe.valid {
                count += 1;
                scope.mark_index(index);
            }
        }
        // `minContains: 0` makes the keyword satisfiable by an empty array,
        // overriding the default non-emptiness.
        if count < self.min {
            cx.report(ValidationMessage::new(
                &self.path,
                self.keyword(),
                path,
                format!(
                    "expected at least {} matching items, found {count}",
                    self.min
                ),
            ));
            return false;
        }
        if let Some(max) = self.max {
            if count > max {
                cx.report(ValidationMessage::new(
                    &self.path,
                    self.keyword(),
                    path,
                    format!("expected at most {max} matching items, found {count}"),
                ));
                return false;
            }
        }
        true
    }
}

pub(crate) fn compile_prefix_items(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let Value::Array(schemas) = schema else {
        return Err(SchemaError::InvalidKeywordShape {
            keyword: "prefixItems",
            expected: "an array of schemas",
        });
    };
    let base = ctx.with_keyword("prefixItems");
    let nodes = schemas
        .iter()
        .enumerate()
        .map(|(index, subschema)| compiler.compile_schema(&base.with_index(index), subschema))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Keyword::PrefixItems(PrefixItemsValidator {
        nodes,
        keyword: "prefixItems",
        path: ctx.keyword_location("prefixItems"),
    })))
}

pub(crate) fn compile_items(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    match schema {
        Value::Array(schemas) => {
            if ctx.draft() == Draft::Draft202012 {
                return Err(SchemaError::InvalidKeywordShape {
                    keyword: "items",
                    expected: "a schema in draft 2020-12 (use prefixItems for tuples)",
                });
            }
            let base = ctx.with_keyword("items");
            let nodes = schemas
                .iter()
                .enumerate()
                .map(|(index, subschema)| {
                    compiler.compile_schema(&base.with_index(index), subschema)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(Keyword::PrefixItems(PrefixItemsValidator {
                nodes,
                keyword: "items",
                path: ctx.keyword_location("items"),
            })))
        }
        _ => {
            let skip = if ctx.draft() == Draft::Draft202012 {
                parent
                    .get("prefixItems")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len)
            } else {
                0
            };
            let node = compiler.compile_schema(&ctx.with_keyword("items"), schema)?;
            Ok(Some(Keyword::Items(ItemsValidator {
                node,
                skip,
                keyword: "items",
                path: ctx.keyword_location("items"),
            })))
        }
    }
}

pub(crate) fn compile_additional_items(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    // Only meaningful behind the array form of `items`.
    let Some(Value::Array(prefix)) = parent.get("items") else {
        return Ok(None);
    };
    let node = compiler.compile_schema(&ctx.with_keyword("additionalItems"), schema)?;
    Ok(Some(Keyword::Items(ItemsValidator {
        node,
        skip: prefix.len(),
        keyword: "additionalItems",
        path: ctx.keyword_location("additionalItems"),
    })))
}

pub(crate) fn compile_contains(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let node = compiler.compile_schema(&ctx.with_keyword("contains"), schema)?;
    let (min, max) = if matches!(ctx.draft(), Draft::Draft201909 | Draft::Draft202012) {
        let min = parent
            .get("minContains")
            .map(|value| expect_u64(value, "minContains"))
            .transpose()?
            .unwrap_or(1);
        let max = parent
            .get("maxContains")
            .map(|value| expect_u64(value, "maxContains"))
            .transpose()?;
        (min, max)
    } else {
        (1, None)
    };
    Ok(Some(Keyword::Contains(ContainsValidator {
        node,
        min,
        max,
        path: ctx.keyword_location("contains"),
    })))
}
