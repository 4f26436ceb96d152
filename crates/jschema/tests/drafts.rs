//! Draft-parameterised behaviour: vocabulary gating, legacy shapes, draft
//! mixing across documents, and meta-schema conformance.
use serde_json::json;

use jschema::Draft;

#[test]
fn dynamic_ref_is_unknown_under_draft7() {
    let schema = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "$dynamicRef": "#items"
    });
    // No binding happens; the schema is an empty constraint set.
    let validator = jschema::compile(&schema).expect("valid schema");
    assert!(validator.is_valid(&json!(42)));
    assert!(validator.is_valid(&json!(["anything"])));
}

#[test]
fn recursive_ref_is_unknown_under_2020_12() {
    let schema = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$recursiveRef": "#"
    });
    let validator = jschema::compile(&schema).expect("valid schema");
    assert!(validator.is_valid(&json!(1)));
}

#[test]
fn array_items_is_rejected_under_2020_12() {
    let schema = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "items": [{"type": "string"}]
    });
    assert!(jschema::compile(&schema).is_err());
}

#[test]
fn dependent_required_is_unknown_under_draft7() {
    let schema = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "dependentRequired": {"a": ["b"]}
    });
    let validator = jschema::compile(&schema).expect("valid schema");
    // Draft 7 spells it `dependencies`; the split keyword has no effect.
    assert!(validator.is_valid(&json!({"a": 1})));
}

#[test]
fn legacy_dependencies_is_unknown_under_2020_12() {
    let schema = json!({"dependencies": {"a": ["b"]}});
    let validator = jschema::compile(&schema).expect("valid schema");
    assert!(validator.is_valid(&json!({"a": 1})));
}

#[test]
fn default_draft_applies_without_schema_member() {
    let schema = json!({"items": [{"type": "string"}]});
    // 2020-12 default rejects the array form...
    assert!(jschema::compile(&schema).is_err());
    // ...which draft 7 accepts.
    let validator = jschema::options()
        .with_draft(Draft::Draft7)
        .build(&schema)
        .expect("valid under draft 7");
    assert!(validator.is_valid(&json!(["a"])));
    assert!(!validator.is_valid(&json!([1])));
}

#[test]
fn documents_of_different_drafts_compose() {
    // A 2020-12 root referencing a draft 7 document: each document keeps its
    // own vocabulary.
    let legacy = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "items": [{"type": "string"}, {"type": "integer"}],
        "additionalItems": false
    });
    let schema = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "properties": {"pair": {"$ref": "https://example.com/legacy.json"}}
    });
    let validator = jschema::options()
        .with_resolver(move |uri: &str| {
            (uri == "https://example.com/legacy.json").then(|| legacy.clone())
        })
        .build(&schema)
        .expect("valid schema");
    assert!(validator.is_valid(&json!({"pair": ["a", 1]})));
    assert!(!validator.is_valid(&json!({"pair": ["a", 1, "extra"]})));
}

#[test]
fn draft4_id_with_fragment_registers_an_anchor() {
    let schema = json!({
        "$schema": "http://json-schema.org/draft-04/schema#",
        "definitions": {
            "name": {"id": "#name", "type": "string"}
        },
        "properties": {"first": {"$ref": "#name"}}
    });
    let validator = jschema::compile(&schema).expect("valid schema");
    assert!(validator.is_valid(&json!({"first": "Ada"})));
    assert!(!validator.is_valid(&json!({"first": 0})));
}

#[test]
fn ref_shadows_siblings_up_to_draft7() {
    let schema = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "definitions": {"any": {}},
        "$ref": "#/definitions/any",
        "type": "string"
    });
    let validator = jschema::compile(&schema).expect("valid schema");
    // The sibling `type` is ignored next to `$ref` in draft 7.
    assert!(validator.is_valid(&json!(42)));
}

#[test]
fn ref_composes_with_siblings_from_2019_09() {
    let schema = json!({
        "$schema": "https://json-schema.org/draft/2019-09/schema",
        "$defs": {"any": {}},
        "$ref": "#/$defs/any",
        "type": "string"
    });
    let validator = jschema::compile(&schema).expect("valid schema");
    assert!(!validator.is_valid(&json!(42)));
    assert!(validator.is_valid(&json!("42")));
}

#[test]
fn meta_schema_conformance_can_be_required() {
    let good = json!({"type": "object", "properties": {"a": {"type": "string"}}});
    assert!(jschema::options()
        .verify_meta_schema(true)
        .build(&good)
        .is_ok());

    let bad = json!({"properties": 5});
    let error = jschema::options()
        .verify_meta_schema(true)
        .build(&bad)
        .unwrap_err();
    assert!(matches!(error, jschema::SchemaError::MetaSchema { .. }));
}

#[test]
fn meta_schemas_resolve_without_user_resolvers() {
    // A direct reference to a bundled meta-schema URI compiles offline.
    let schema = json!({"$ref": "http://json-schema.org/draft-07/schema#"});
    let validator = jschema::compile(&schema).expect("valid schema");
    assert!(validator.is_valid(&json!({"type": "string"})));
    assert!(!validator.is_valid(&json!({"type": 5})));
}

#[test]
fn recursive_anchor_flag_requires_a_boolean() {
    let schema = json!({
        "$schema": "https://json-schema.org/draft/2019-09/schema",
        "$recursiveAnchor": "yes"
    });
    assert!(jschema::compile(&schema).is_err());
}
