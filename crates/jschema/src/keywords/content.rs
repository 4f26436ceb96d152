//! `contentEncoding` and `contentMediaType`.
//!
//! Assertions in draft 7 only; 2019-09 turned both into annotations, so the
//! producer table never reaches this module for the later drafts.
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::content;
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::keywords::{expect_str, Keyword, Validate};
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct ContentEncodingValidator {
    encoding: String,
    pub(crate) path: SchemaLocation,
}

impl ContentEncodingValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "contentEncoding"
    }
}

impl Validate for ContentEncodingValidator {
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
        // Only base64 is checkable; other encodings pass as annotations.
        if self.encoding != "base64" || content::is_base64(text) {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            "not valid base64".to_owned(),
        ));
        false
    }
}

pub(crate) struct ContentMediaTypeValidator {
    media_type: String,
    check: fn(&str) -> bool,
    /// With a base64 sibling the decoded form is what would have to parse,
    /// which this library does not materialise; the check is skipped.
    encoded: bool,
    pub(crate) path: SchemaLocation,
}

impl ContentMediaTypeValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "contentMediaType"
    }
}

impl Validate for ContentMediaTypeValidator {
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
        if self.encoded || (self.check)(text) {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!("not valid {}", self.media_type),
        ));
        false
    }
}

pub(crate) fn compile_encoding(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let encoding = expect_str(schema, "contentEncoding")?;
    if ctx.draft() != jschema_scope::Draft::Draft7 {
        return Ok(None);
    }
    Ok(Some(Keyword::ContentEncoding(ContentEncodingValidator {
        encoding: encoding.to_owned(),
        path: ctx.keyword_location("contentEncoding"),
    })))
}

pub(crate) fn compile_media_type(
    _compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let media_type = expect_str(schema, "contentMediaType")?;
    if ctx.draft() != jschema_scope::Draft::Draft7 {
        return Ok(None);
    }
    let Some(check) = content::media_type_check(media_type) else {
        return Ok(None);
    };
    let encoded = parent.contains_key("contentEncoding");
    Ok(Some(Keyword::ContentMediaType(ContentMediaTypeValidator {
        media_type: media_type.to_owned(),
        check,
        encoded,
        path: ctx.keyword_location("contentMediaType"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    fn draft7(body: serde_json::Value) -> serde_json::Value {
        let mut schema = body;
        schema["$schema"] = json!("http://json-schema.org/draft-07/schema#");
        schema
    }

    #[test_case(json!({"contentEncoding": "base64"}), json!("Zm9vYmFy"), true)]
    #[test_case(json!({"contentEncoding": "base64"}), json!("not base64!"), false)]
    #[test_case(json!({"contentMediaType": "application/json"}), json!("{\"a\": 1}"), true)]
    #[test_case(json!({"contentMediaType": "application/json"}), json!("{"), false)]
    #[test_case(json!({"contentMediaType": "text/html"}), json!("<p>"), true; "uncheckable media types pass")]
    fn draft7_assertions(body: serde_json::Value, instance: serde_json::Value, expected: bool) {
        let validator = crate::compile(&draft7(body)).expect("valid schema");
        assert_eq!(validator.is_valid(&instance), expected);
    }

    #[test]
    fn annotations_only_from_2019_09() {
        let schema = json!({
            "$schema": "https://json-schema.org/draft/2019-09/schema",
            "contentEncoding": "base64"
        });
        let validator = crate::compile(&schema).expect("valid schema");
        assert!(validator.is_valid(&json!("not base64!")));
    }
}
