//! Keyword validators.
//!
//! One variant per keyword, dispatched through a tagged sum rather than a
//! trait-object hierarchy so the evaluation hot path stays a plain `match`.
//! Each module owns its validator struct(s) and the `compile_*` producer the
//! draft builder dispatches to.
pub(crate) mod array;
pub(crate) mod combinators;
pub(crate) mod conditional;
pub(crate) mod content;
pub(crate) mod dependencies;
pub(crate) mod format;
pub(crate) mod items;
pub(crate) mod literal;
pub(crate) mod numeric;
pub(crate) mod object;
pub(crate) mod properties;
pub(crate) mod reference;
pub(crate) mod string;
pub(crate) mod type_;
pub(crate) mod unevaluated;

use enum_dispatch::enum_dispatch;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::evaluation::{EvalContext, Scope};
use crate::nodes::RefSlot;
use crate::paths::{InstancePath, SchemaLocation};

use self::array::{MaxItemsValidator, MinItemsValidator, UniqueItemsValidator};
use self::combinators::{AllOfValidator, AnyOfValidator, NotValidator, OneOfValidator};
use self::conditional::IfThenElseValidator;
use self::content::{ContentEncodingValidator, ContentMediaTypeValidator};
use self::dependencies::{
    DependenciesValidator, DependentRequiredValidator, DependentSchemasValidator,
};
use self::format::FormatValidator;
use self::items::{ContainsValidator, ItemsValidator, PrefixItemsValidator};
use self::literal::{ConstValidator, EnumValidator};
use self::numeric::{MaximumValidator, MinimumValidator, MultipleOfValidator};
use self::object::{MaxPropertiesValidator, MinPropertiesValidator, RequiredValidator};
use self::properties::{
    AdditionalPropertiesValidator, PatternPropertiesValidator, PropertiesValidator,
    PropertyNamesValidator,
};
use self::reference::{DynamicRefValidator, RecursiveRefValidator, RefValidator};
use self::string::{MaxLengthValidator, MinLengthValidator, PatternValidator};
use self::type_::TypeValidator;
use self::unevaluated::{UnevaluatedItemsValidator, UnevaluatedPropertiesValidator};

/// One keyword's contract: pass silently or report path-qualified messages.
#[enum_dispatch]
pub(crate) trait Validate {
    fn validate(
        &self,
        cx: &mut EvalContext<'_, '_>,
        instance: &Value,
        path: &InstancePath<'_>,
        scope: &mut Scope,
    ) -> bool;
}

#[enum_dispatch(Validate)]
pub(crate) enum Keyword {
    Type(TypeValidator),
    Const(ConstValidator),
    Enum(EnumValidator),
    MultipleOf(MultipleOfValidator),
    Minimum(MinimumValidator),
    Maximum(MaximumValidator),
    MinLength(MinLengthValidator),
    MaxLength(MaxLengthValidator),
    Pattern(PatternValidator),
    Format(FormatValidator),
    ContentEncoding(ContentEncodingValidator),
    ContentMediaType(ContentMediaTypeValidator),
    MinItems(MinItemsValidator),
    MaxItems(MaxItemsValidator),
    UniqueItems(UniqueItemsValidator),
    MinProperties(MinPropertiesValidator),
    MaxProperties(MaxPropertiesValidator),
    Required(RequiredValidator),
    AllOf(AllOfValidator),
    AnyOf(AnyOfValidator),
    OneOf(OneOfValidator),
    Not(NotValidator),
    IfThenElse(IfThenElseValidator),
    Ref(RefValidator),
    DynamicRef(DynamicRefValidator),
    RecursiveRef(RecursiveRefValidator),
    Dependencies(DependenciesValidator),
    DependentRequired(DependentRequiredValidator),
    DependentSchemas(DependentSchemasValidator),
    Properties(PropertiesValidator),
    PatternProperties(PatternPropertiesValidator),
    AdditionalProperties(AdditionalPropertiesValidator),
    PropertyNames(PropertyNamesValidator),
    PrefixItems(PrefixItemsValidator),
    Items(ItemsValidator),
    Contains(ContainsValidator),
    UnevaluatedItems(UnevaluatedItemsValidator),
    UnevaluatedProperties(UnevaluatedPropertiesValidator),
}

macro_rules! each_keyword {
    ($self:expr, $validator:ident => $body:expr) => {
        match $self {
            Keyword::Type($validator) => $body,
            Keyword::Const($validator) => $body,
            Keyword::Enum($validator) => $body,
            Keyword::MultipleOf($validator) => $body,
            Keyword::Minimum($validator) => $body,
            Keyword::Maximum($validator) => $body,
            Keyword::MinLength($validator) => $body,
            Keyword::MaxLength($validator) => $body,
            Keyword::Pattern($validator) => $body,
            Keyword::Format($validator) => $body,
            Keyword::ContentEncoding($validator) => $body,
            Keyword::ContentMediaType($validator) => $body,
            Keyword::MinItems($validator) => $body,
            Keyword::MaxItems($validator) => $body,
            Keyword::UniqueItems($validator) => $body,
            Keyword::MinProperties($validator) => $body,
            Keyword::MaxProperties($validator) => $body,
            Keyword::Required($validator) => $body,
            Keyword::AllOf($validator) => $body,
            Keyword::AnyOf($validator) => $body,
            Keyword::OneOf($validator) => $body,
            Keyword::Not($validator) => $body,
            Keyword::IfThenElse($validator) => $body,
            Keyword::Ref($validator) => $body,
            Keyword::DynamicRef($validator) => $body,
            Keyword::RecursiveRef($validator) => $body,
            Keyword::Dependencies($validator) => $body,
            Keyword::DependentRequired($validator) => $body,
            Keyword::DependentSchemas($validator) => $body,
            Keyword::Properties($validator) => $body,
            Keyword::PatternProperties($validator) => $body,
            Keyword::AdditionalProperties($validator) => $body,
            Keyword::PropertyNames($validator) => $body,
            Keyword::PrefixItems($validator) => $body,
            Keyword::Items($validator) => $body,
            Keyword::Contains($validator) => $body,
            Keyword::UnevaluatedItems($validator) => $body,
            Keyword::UnevaluatedProperties($validator) => $body,
        }
    };
}

impl Keyword {
    /// The keyword name used in validation messages and trace records.
    pub(crate) fn name(&self) -> &'static str {
        each_keyword!(self, validator => validator.keyword())
    }

    /// Schema path of the keyword: its node's absolute URI with the keyword
    /// name appended.
    pub(crate) fn location(&self) -> &SchemaLocation {
        each_keyword!(self, validator => &validator.path)
    }

    /// The reference slot of a `$ref` keyword, for default-value chasing.
    pub(crate) fn static_ref_slot(&self) -> Option<RefSlot> {
        match self {
            Keyword::Ref(validator) => Some(validator.slot),
            _ => None,
        }
    }
}

/// Extracts a non-negative integer bound, tolerating floats with a zero
/// fraction the way lenient parsers do.
pub(crate) fn expect_u64(value: &Value, keyword: &'static str) -> Result<u64, SchemaError> {
    if let Some(number) = value.as_u64() {
        return Ok(number);
    }
    if let Some(number) = value.as_f64() {
        if number >= 0.0 && number.trunc() == number {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            return Ok(number as u64);
        }
    }
    Err(SchemaError::InvalidKeywordShape {
        keyword,
        expected: "a non-negative integer",
    })
}

pub(crate) fn expect_str<'v>(
    value: &'v Value,
    keyword: &'static str,
) -> Result<&'v str, SchemaError> {
    value.as_str().ok_or(SchemaError::InvalidKeywordShape {
        keyword,
        expected: "a string",
    })
}

pub(crate) fn expect_array<'v>(
    value: &'v Value,
    keyword: &'static str,
) -> Result<&'v Vec<Value>, SchemaError> {
    value.as_array().ok_or(SchemaError::InvalidKeywordShape {
        keyword,
        expected: "an array",
    })
}

pub(crate) fn expect_object<'v>(
    value: &'v Value,
    keyword: &'static str,
) -> Result<&'v Map<String, Value>, SchemaError> {
    value.as_object().ok_or(SchemaError::InvalidKeywordShape {
        keyword,
        expected: "an object",
    })
}
