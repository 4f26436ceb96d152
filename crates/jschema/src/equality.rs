//! Canonical JSON equality and cross-representation numeric comparison.
//!
//! `serde_json` stores `1` and `1.0` as different `Number` representations,
//! but schema semantics compare by numeric value: `const: 1` accepts `1.0`,
//! and `uniqueItems` treats them as duplicates. `num-cmp` provides the exact
//! mixed `u64`/`i64`/`f64` comparisons.
use std::cmp::Ordering;

use num_cmp::NumCmp;
use serde_json::{Number, Value};

enum Repr {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

fn repr(number: &Number) -> Repr {
    if let Some(value) = number.as_u64() {
        Repr::Unsigned(value)
    } else if let Some(value) = number.as_i64() {
        Repr::Signed(value)
    } else {
        Repr::Float(number.as_f64().unwrap_or(f64::NAN))
    }
}

/// Compares two JSON numbers by value. `None` only for NaN, which valid JSON
/// cannot contain.
pub(crate) fn compare(left: &Number, right: &Number) -> Option<Ordering> {
    match (repr(left), repr(right)) {
        (Repr::Unsigned(a), Repr::Unsigned(b)) => Some(a.cmp(&b)),
        (Repr::Unsigned(a), Repr::Signed(b)) => NumCmp::num_cmp(a, b),
        (Repr::Unsigned(a), Repr::Float(b)) => NumCmp::num_cmp(a, b),
        (Repr::Signed(a), Repr::Unsigned(b)) => NumCmp::num_cmp(a, b),
        (Repr::Signed(a), Repr::Signed(b)) => Some(a.cmp(&b)),
        (Repr::Signed(a), Repr::Float(b)) => NumCmp::num_cmp(a, b),
        (Repr::Float(a), Repr::Unsigned(b)) => NumCmp::num_cmp(a, b),
        (Repr::Float(a), Repr::Signed(b)) => NumCmp::num_cmp(a, b),
        (Repr::Float(a), Repr::Float(b)) => a.partial_cmp(&b),
    }
}

pub(crate) fn numbers_equal(left: &Number, right: &Number) -> bool {
    compare(left, right) == Some(Ordering::Equal)
}

/// Structural equality over canonical JSON forms: numbers by value, object
/// member order ignored.
pub(crate) fn json_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| json_equal(x, y)))
        }
        (a, b) => a == b,
    }
}

/// Outcome of a `multipleOf` divisibility check.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Divisibility {
    Multiple,
    NotMultiple,
    /// One of the operands is outside the exactly-representable `f64` range;
    /// the result cannot be trusted and is reported, never silently passed.
    PrecisionLoss,
}

const MAX_EXACT_INT: u64 = 1 << 53;

fn exact_f64(number: &Number) -> Option<f64> {
    match repr(number) {
        Repr::Unsigned(value) if value <= MAX_EXACT_INT => Some(value as f64),
        Repr::Signed(value) if value.unsigned_abs() <= MAX_EXACT_INT => Some(value as f64),
        Repr::Float(value) => Some(value),
        _ => None,
    }
}

/// Exact-rational divisibility, approximated through `f64` only when both
/// operands are exactly representable.
pub(crate) fn is_multiple_of(value: &Number, factor: &Number) -> Divisibility {
    if let (Repr::Signed(_) | Repr::Unsigned(_), Repr::Signed(_) | Repr::Unsigned(_)) =
        (repr(value), repr(factor))
    {
        let a = value
            .as_i64()
            .map_or_else(|| i128::from(value.as_u64().unwrap_or(0)), i128::from);
        let b = factor
            .as_i64()
            .map_or_else(|| i128::from(factor.as_u64().unwrap_or(0)), i128::from);
        if b == 0 {
            return Divisibility::NotMultiple;
        }
        return if a % b == 0 {
            Divisibility::Multiple
        } else {
            Divisibility::NotMultiple
        };
    }
    match (exact_f64(value), exact_f64(factor)) {
        (Some(a), Some(b)) => {
            if (a / b).fract() == 0.0 {
                Divisibility::Multiple
            } else {
                Divisibility::NotMultiple
            }
        }
        _ => Divisibility::PrecisionLoss,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_multiple_of, json_equal, Divisibility};
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!(1), json!(1.0), true)]
    #[test_case(json!(1), json!(1.5), false)]
    #[test_case(json!(-2), json!(-2.0), true)]
    #[test_case(json!({"a": 1, "b": 2}), json!({"b": 2.0, "a": 1.0}), true)]
    #[test_case(json!([1, [2]]), json!([1.0, [2.0]]), true)]
    #[test_case(json!([1, 2]), json!([2, 1]), false)]
    #[test_case(json!("1"), json!(1), false)]
    fn canonical_equality(left: serde_json::Value, right: serde_json::Value, expected: bool) {
        assert_eq!(json_equal(&left, &right), expected);
        assert_eq!(json_equal(&right, &left), expected);
    }

    fn number(value: serde_json::Value) -> serde_json::Number {
        value.as_number().expect("numeric fixture").clone()
    }

    #[test_case(json!(10), json!(5), Divisibility::Multiple)]
    #[test_case(json!(10), json!(3), Divisibility::NotMultiple)]
    #[test_case(json!(4.5), json!(1.5), Divisibility::Multiple)]
    #[test_case(json!(7.5), json!(2.0), Divisibility::NotMultiple)]
    #[test_case(json!(10), json!(0), Divisibility::NotMultiple)]
    #[test_case(json!(9_007_199_254_740_993_u64), json!(0.5), Divisibility::PrecisionLoss)]
    fn divisibility(value: serde_json::Value, factor: serde_json::Value, expected: Divisibility) {
        assert_eq!(is_multiple_of(&number(value), &number(factor)), expected);
    }
}
