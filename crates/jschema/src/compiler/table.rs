//! The ordered keyword-producer table.
//!
//! One shared table serves every draft: the vocabulary gate in
//! `compile_object` filters names a draft does not recognise, and the
//! producers whose shapes diverge across drafts branch on the context. The
//! order is the evaluation order frozen into every node: assertions, logic
//! applicators, references, property/item applicators, unevaluated sweeps.
use serde_json::{Map, Value};

use super::{BuildContext, Compiler};
use crate::error::SchemaError;
use crate::keywords::{
    array, combinators, conditional, content, dependencies, expect_object, format, items, literal,
    numeric, object, properties, reference, string, type_, unevaluated, Keyword,
};

pub(super) type Producer = fn(
    &mut Compiler<'_>,
    &BuildContext,
    &Map<String, Value>,
    &Value,
) -> Result<Option<Keyword>, SchemaError>;

pub(super) const PRODUCERS: &[(&str, Producer)] = &[
    // Named subschemas first, so references into them wire up immediately.
    ("definitions", compile_definitions),
    ("$defs", compile_defs),
    // Assertions.
    ("type", type_::compile),
    ("enum", literal::compile_enum),
    ("const", literal::compile_const),
    ("multipleOf", numeric::compile_multiple_of),
    ("maximum", numeric::compile_maximum),
    ("exclusiveMaximum", numeric::compile_exclusive_maximum),
    ("minimum", numeric::compile_minimum),
    ("exclusiveMinimum", numeric::compile_exclusive_minimum),
    ("maxLength", string::compile_max_length),
    ("minLength", string::compile_min_length),
    ("pattern", string::compile_pattern),
    ("format", format::compile),
    ("contentEncoding", content::compile_encoding),
    ("contentMediaType", content::compile_media_type),
    ("maxItems", array::compile_max_items),
    ("minItems", array::compile_min_items),
    ("uniqueItems", array::compile_unique_items),
    ("maxProperties", object::compile_max_properties),
    ("minProperties", object::compile_min_properties),
    ("required", object::compile_required),
    ("dependentRequired", dependencies::compile_dependent_required),
    // Logic applicators.
    ("allOf", combinators::compile_all_of),
    ("anyOf", combinators::compile_any_of),
    ("oneOf", combinators::compile_one_of),
    ("not", combinators::compile_not),
    ("if", conditional::compile),
    // References.
    ("$ref", reference::compile_ref),
    ("$recursiveRef", reference::compile_recursive_ref),
    ("$dynamicRef", reference::compile_dynamic_ref),
    // Property and item applicators.
    ("dependencies", dependencies::compile_dependencies),
    ("dependentSchemas", dependencies::compile_dependent_schemas),
    ("propertyNames", properties::compile_property_names),
    ("properties", properties::compile_properties),
    ("patternProperties", properties::compile_pattern_properties),
    (
        "additionalProperties",
        properties::compile_additional_properties,
    ),
    ("prefixItems", items::compile_prefix_items),
    ("items", items::compile_items),
    ("additionalItems", items::compile_additional_items),
    ("contains", items::compile_contains),
    // Final sweeps over whatever the scope has not seen.
    ("unevaluatedItems", unevaluated::compile_unevaluated_items),
    (
        "unevaluatedProperties",
        unevaluated::compile_unevaluated_properties,
    ),
];

fn compile_named_subschemas(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    schema: &Value,
    keyword: &'static str,
) -> Result<Option<Keyword>, SchemaError> {
    let members = expect_object(schema, keyword)?;
    let base = ctx.with_keyword(keyword);
    for (name, subschema) in members {
        compiler.compile_schema(&base.with_keyword(name), subschema)?;
    }
    // Registration is the point; no validator is produced.
    Ok(None)
}

pub(super) fn compile_definitions(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    compile_named_subschemas(compiler, ctx, schema, "definitions")
}

fn compile_defs(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    compile_named_subschemas(compiler, ctx, schema, "$defs")
}
