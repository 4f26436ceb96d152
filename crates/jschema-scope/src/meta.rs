//! Bundled meta-schema documents.
//!
//! One document per supported draft, parsed once on first use. For 2019-09
//! and 2020-12 the vocabulary split is flattened into a single document, so
//! the registry serves exactly one resource per `$schema` URI.
use std::sync::LazyLock;

use serde_json::Value;

use crate::{uri::strip_empty_fragment, Draft};

static DRAFT4: LazyLock<Value> = LazyLock::new(|| parse(include_str!("../metaschemas/draft4.json")));
static DRAFT6: LazyLock<Value> = LazyLock::new(|| parse(include_str!("../metaschemas/draft6.json")));
static DRAFT7: LazyLock<Value> = LazyLock::new(|| parse(include_str!("../metaschemas/draft7.json")));
static DRAFT201909: LazyLock<Value> =
    LazyLock::new(|| parse(include_str!("../metaschemas/draft201909.json")));
static DRAFT202012: LazyLock<Value> =
    LazyLock::new(|| parse(include_str!("../metaschemas/draft202012.json")));

fn parse(text: &str) -> Value {
    serde_json::from_str(text).expect("bundled meta-schema is valid JSON")
}

/// The bundled meta-schema for `draft`.
#[must_use]
pub fn schema(draft: Draft) -> &'static Value {
    match draft {
        Draft::Draft4 => &DRAFT4,
        Draft::Draft6 => &DRAFT6,
        Draft::Draft7 => &DRAFT7,
        Draft::Draft201909 => &DRAFT201909,
        Draft::Draft202012 => &DRAFT202012,
    }
}

/// Look up a bundled meta-schema by URI, tolerating a missing or empty
/// fragment on the draft 4–7 identifiers.
#[must_use]
pub fn by_uri(uri: &str) -> Option<&'static Value> {
    let key = strip_empty_fragment(uri);
    [
        Draft::Draft4,
        Draft::Draft6,
        Draft::Draft7,
        Draft::Draft201909,
        Draft::Draft202012,
    ]
    .into_iter()
    .find(|draft| strip_empty_fragment(draft.schema_uri()) == key)
    .map(schema)
}

#[cfg(test)]
mod tests {
    use super::by_uri;

    #[test]
    fn lookup_tolerates_empty_fragment() {
        assert!(by_uri("http://json-schema.org/draft-07/schema#").is_some());
        assert!(by_uri("http://json-schema.org/draft-07/schema").is_some());
        assert!(by_uri("https://json-schema.org/draft/2020-12/schema").is_some());
        assert!(by_uri("https://example.com/not-a-meta-schema").is_none());
    }

    #[test]
    fn documents_parse_and_identify_themselves() {
        for draft in [
            crate::Draft::Draft4,
            crate::Draft::Draft6,
            crate::Draft::Draft7,
            crate::Draft::Draft201909,
            crate::Draft::Draft202012,
        ] {
            let doc = super::schema(draft);
            let declared = doc
                .get("$schema")
                .and_then(serde_json::Value::as_str)
                .expect("meta-schema declares $schema");
            assert_eq!(declared, draft.schema_uri());
        }
    }
}
