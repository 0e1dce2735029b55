use serde_json::Value;

/// Coerces a loosely typed value into a finite number.
///
/// Registry payloads carry numbers as JSON numbers, numeric strings, `null`
/// and the literal string `"null"`. All of those collapse to either a
/// finite `f64` or `None`; this function never fails.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// Same as [`to_number`], with a missing key treated as absent.
pub fn coerce(value: Option<&Value>) -> Option<f64> {
    value.and_then(to_number)
}

pub fn parse_numeric_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_absent_inputs() {
        assert_eq!(coerce(None), None);
        assert_eq!(to_number(&Value::Null), None);
        assert_eq!(to_number(&json!("null")), None);
        assert_eq!(to_number(&json!("")), None);
        assert_eq!(to_number(&json!("abc")), None);
    }

    #[test]
    fn test_parsed_inputs() {
        assert_eq!(to_number(&json!("12.5")), Some(12.5));
        assert_eq!(to_number(&json!(-3)), Some(-3.0));
        assert_eq!(to_number(&json!(0)), Some(0.0));
        assert_eq!(to_number(&json!(" 42 ")), Some(42.0));
    }

    #[test]
    fn test_non_finite_strings_are_absent() {
        assert_eq!(to_number(&json!("NaN")), None);
        assert_eq!(to_number(&json!("inf")), None);
        assert_eq!(to_number(&json!(true)), None);
        assert_eq!(to_number(&json!([1, 2])), None);
    }

    proptest! {
        #[test]
        fn prop_finite_numbers_round_trip(v in -1.0e12f64..1.0e12f64) {
            prop_assert_eq!(to_number(&json!(v)), Some(v));
            prop_assert_eq!(to_number(&json!(v.to_string())), Some(v));
        }

        #[test]
        fn prop_never_panics_on_arbitrary_text(s in ".*") {
            if let Some(v) = to_number(&json!(s)) {
                prop_assert!(v.is_finite());
            }
        }
    }
}
