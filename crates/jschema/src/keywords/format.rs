//! The `format` keyword.
//!
//! Assertion is opt-in through the compilation options; otherwise `format` is
//! an annotation and no validator is produced. Formats outside the supported
//! list are ignored, never an error.
use serde_json::{Map, Value};

use crate::compiler::{BuildContext, Compiler};
use crate::error::{SchemaError, ValidationMessage};
use crate::evaluation::{EvalContext, Scope};
use crate::formats;
use crate::keywords::{expect_str, Keyword, Validate};
use crate::paths::{InstancePath, SchemaLocation};

pub(crate) struct FormatValidator {
    format: String,
    check: fn(&str) -> bool,
    pub(crate) path: SchemaLocation,
}

impl FormatValidator {
    pub(crate) fn keyword(&self) -> &'static str {
        "format"
    }
}

impl Validate for FormatValidator {
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
        if (self.check)(text) {
            return true;
        }
        cx.report(ValidationMessage::new(
            &self.path,
            self.keyword(),
            path,
            format!("not a valid {:?}", self.format),
        ));
        false
    }
}

pub(crate) fn compile(
    compiler: &mut Compiler<'_>,
    ctx: &BuildContext,
    _parent: &Map<String, Value>,
    schema: &Value,
) -> Result<Option<Keyword>, SchemaError> {
    let format = expect_str(schema, "format")?;
    if !compiler.options().formats_asserted() {
        return Ok(None);
    }
    let Some(check) = formats::lookup(format) else {
        return Ok(None);
    };
    Ok(Some(Keyword::Format(FormatValidator {
        format: format.to_owned(),
        check,
        path: ctx.keyword_location("format"),
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    fn assertive(schema: &serde_json::Value) -> crate::CompiledSchema {
        crate::options()
            .assert_formats(true)
            .build(schema)
            .expect("valid schema")
    }

    #[test_case(json!({"format": "ipv4"}), json!("127.0.0.1"), true)]
    #[test_case(json!({"format": "ipv4"}), json!("999.0.0.1"), false)]
    #[test_case(json!({"format": "date-time"}), json!("2018-11-13T20:20:39+00:00"), true)]
    #[test_case(json!({"format": "date-time"}), json!("yesterday"), false)]
    #[test_case(json!({"format": "regex"}), json!("^a+$"), true)]
    #[test_case(json!({"format": "regex"}), json!("(unclosed"), false)]
    #[test_case(json!({"format": "hostname"}), json!("example.com"), true)]
    #[test_case(json!({"format": "no-such-format"}), json!("anything"), true; "unknown formats are ignored")]
    #[test_case(json!({"format": "ipv4"}), json!(42), true; "non strings pass")]
    fn assertions(schema: serde_json::Value, instance: serde_json::Value, expected: bool) {
        assert_eq!(assertive(&schema).is_valid(&instance), expected);
    }

    #[test]
    fn annotation_only_by_default() {
        let validator = crate::compile(&json!({"format": "ipv4"})).expect("valid schema");
        assert!(validator.is_valid(&json!("not an ip")));
    }
}
