use std::fmt;

use serde_json::Value;

/// JSON Schema specification version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Draft {
    Draft4,
    Draft6,
    Draft7,
    Draft201909,
    Draft202012,
}

impl Draft {
    /// The `$schema` URI identifying this draft.
    #[must_use]
    pub fn schema_uri(self) -> &'static str {
        match self {
            Draft::Draft4 => "http://json-schema.org/draft-04/schema#",
            Draft::Draft6 => "http://json-schema.org/draft-06/schema#",
            Draft::Draft7 => "http://json-schema.org/draft-07/schema#",
            Draft::Draft201909 => "https://json-schema.org/draft/2019-09/schema",
            Draft::Draft202012 => "https://json-schema.org/draft/2020-12/schema",
        }
    }

    /// Exact-match lookup of a `$schema` value. Anything unrecognised is the
    /// caller's "Unsupported schema version" error.
    #[must_use]
    pub fn from_schema_uri(uri: &str) -> Option<Draft> {
        match uri {
            "http://json-schema.org/draft-04/schema#" => Some(Draft::Draft4),
            "http://json-schema.org/draft-06/schema#" => Some(Draft::Draft6),
            "http://json-schema.org/draft-07/schema#" => Some(Draft::Draft7),
            "https://json-schema.org/draft/2019-09/schema" => Some(Draft::Draft201909),
            "https://json-schema.org/draft/2020-12/schema" => Some(Draft::Draft202012),
            _ => None,
        }
    }

    /// The `$schema` member of a document root, if it is a string.
    #[must_use]
    pub fn schema_member(document: &Value) -> Option<&str> {
        document.as_object()?.get("$schema")?.as_str()
    }

    /// Name of the keyword declaring a schema identifier.
    #[must_use]
    pub fn identifier_keyword(self) -> &'static str {
        match self {
            Draft::Draft4 => "id",
            _ => "$id",
        }
    }

    /// Whether `keyword` belongs to this draft's vocabulary.
    ///
    /// Keys outside the vocabulary are never an error; the builder preserves
    /// their raw JSON so that later references can still point into them.
    #[must_use]
    pub fn recognizes(self, keyword: &str) -> bool {
        if COMMON.contains(&keyword) {
            return true;
        }
        match self {
            Draft::Draft4 => matches!(
                keyword,
                "id" | "dependencies" | "definitions" | "additionalItems"
            ),
            Draft::Draft6 => matches!(
                keyword,
                "$id"
                    | "dependencies"
                    | "definitions"
                    | "additionalItems"
                    | "const"
                    | "contains"
                    | "propertyNames"
                    | "examples"
            ),
            Draft::Draft7 => matches!(
                keyword,
                "$id"
                    | "dependencies"
                    | "definitions"
                    | "additionalItems"
                    | "const"
                    | "contains"
                    | "propertyNames"
                    | "examples"
                    | "$comment"
                    | "if"
                    | "then"
                    | "else"
                    | "readOnly"
                    | "writeOnly"
                    | "contentEncoding"
                    | "contentMediaType"
            ),
            Draft::Draft201909 => matches!(
                keyword,
                "$id"
                    | "$defs"
                    | "$anchor"
                    | "$recursiveRef"
                    | "$recursiveAnchor"
                    | "$vocabulary"
                    | "$comment"
                    | "const"
                    | "contains"
                    | "minContains"
                    | "maxContains"
                    | "propertyNames"
                    | "examples"
                    | "if"
                    | "then"
                    | "else"
                    | "readOnly"
                    | "writeOnly"
                    | "deprecated"
                    | "contentEncoding"
                    | "contentMediaType"
                    | "contentSchema"
                    | "dependentRequired"
                    | "dependentSchemas"
                    | "unevaluatedItems"
                    | "unevaluatedProperties"
                    | "additionalItems"
            ),
            Draft::Draft202012 => matches!(
                keyword,
                "$id"
                    | "$defs"
                    | "$anchor"
                    | "$dynamicRef"
                    | "$dynamicAnchor"
                    | "$vocabulary"
                    | "$comment"
                    | "const"
                    | "contains"
                    | "minContains"
                    | "maxContains"
                    | "propertyNames"
                    | "examples"
                    | "if"
                    | "then"
                    | "else"
                    | "readOnly"
                    | "writeOnly"
                    | "deprecated"
                    | "contentEncoding"
                    | "contentMediaType"
                    | "contentSchema"
                    | "dependentRequired"
                    | "dependentSchemas"
                    | "unevaluatedItems"
                    | "unevaluatedProperties"
                    | "prefixItems"
            ),
        }
    }

    /// `$ref` siblings are ignored up to draft 7 and evaluated from 2019-09 on.
    #[must_use]
    pub fn ref_ignores_siblings(self) -> bool {
        matches!(self, Draft::Draft4 | Draft::Draft6 | Draft::Draft7)
    }
}

/// Keywords common to every supported draft.
const COMMON: &[&str] = &[
    "$schema",
    "$ref",
    "type",
    "enum",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "format",
    "items",
    "maxItems",
    "minItems",
    "uniqueItems",
    "maxProperties",
    "minProperties",
    "required",
    "properties",
    "patternProperties",
    "additionalProperties",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "title",
    "description",
    "default",
];

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Draft::Draft4 => "draft-04",
            Draft::Draft6 => "draft-06",
            Draft::Draft7 => "draft-07",
            Draft::Draft201909 => "2019-09",
            Draft::Draft202012 => "2020-12",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::Draft;
    use test_case::test_case;

    #[test_case("http://json-schema.org/draft-04/schema#", Some(Draft::Draft4))]
    #[test_case("http://json-schema.org/draft-07/schema#", Some(Draft::Draft7))]
    #[test_case("https://json-schema.org/draft/2020-12/schema", Some(Draft::Draft202012))]
    #[test_case("http://json-schema.org/draft-07/schema", None; "missing trailing hash")]
    #[test_case("https://json-schema.org/draft/2021-01/schema", None; "unknown draft")]
    fn schema_uri_lookup(uri: &str, expected: Option<Draft>) {
        assert_eq!(Draft::from_schema_uri(uri), expected);
    }

    #[test_case(Draft::Draft7, "$dynamicRef", false)]
    #[test_case(Draft::Draft202012, "$dynamicRef", true)]
    #[test_case(Draft::Draft201909, "$recursiveRef", true)]
    #[test_case(Draft::Draft202012, "$recursiveRef", false)]
    #[test_case(Draft::Draft4, "const", false)]
    #[test_case(Draft::Draft6, "const", true)]
    #[test_case(Draft::Draft202012, "prefixItems", true)]
    #[test_case(Draft::Draft201909, "prefixItems", false)]
    #[test_case(Draft::Draft202012, "additionalItems", false)]
    #[test_case(Draft::Draft201909, "dependencies", false)]
    #[test_case(Draft::Draft7, "dependencies", true)]
    fn vocabulary_gating(draft: Draft, keyword: &str, expected: bool) {
        assert_eq!(draft.recognizes(keyword), expected);
    }

    #[test]
    fn identifier_keyword() {
        assert_eq!(Draft::Draft4.identifier_keyword(), "id");
        assert_eq!(Draft::Draft6.identifier_keyword(), "$id");
        assert_eq!(Draft::Draft202012.identifier_keyword(), "$id");
    }
}
