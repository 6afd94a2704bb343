//! Helpers over `serde_json::Value`, the data model every rule validates.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static NULL: Value = Value::Null;

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?\s*$").expect("numeric pattern is valid")
});

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-+]?\d+\s*$").expect("integer pattern is valid"));

/// Shared `null`, returned for attributes that do not exist.
#[must_use]
pub fn null() -> &'static Value {
    &NULL
}

/// Default emptiness predicate: `null`, `""`, `[]` and `{}` are empty.
#[must_use]
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Human-readable type name used in error parameters.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Looks up one path segment: objects by key, arrays by parsed index.
#[must_use]
pub fn lookup<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Resolves a sequence of segments, descending one level per segment.
pub fn resolve_path<'v, S>(value: &'v Value, segments: &[S]) -> Option<&'v Value>
where
    S: AsRef<str>,
{
    segments
        .iter()
        .try_fold(value, |current, segment| lookup(current, segment.as_ref()))
}

/// Reads a number, accepting JSON numbers and numeric strings.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if NUMERIC.is_match(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Returns `true` for integral JSON numbers and integer strings.
#[must_use]
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        Value::String(s) => INTEGER.is_match(s),
        _ => false,
    }
}

/// Converts a bound to a JSON number, keeping whole numbers integral.
#[must_use]
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

/// Scalar rendering used by loose comparisons.
///
/// Booleans render as `"1"`/`"0"` and `null` as `""`; containers have no
/// scalar form.
#[must_use]
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(true) => Some("1".to_owned()),
        Value::Bool(false) => Some("0".to_owned()),
        Value::Number(n) => Some(number_value(n.as_f64()?).to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Loose equality: numeric when both sides are numeric, otherwise by
/// scalar rendering.
#[must_use]
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    if let (Some(l), Some(r)) = (as_number(left), as_number(right)) {
        return l == r;
    }
    match (scalar_string(left), scalar_string(right)) {
        (Some(l), Some(r)) => l == r,
        _ => left == right,
    }
}

/// Orders two scalars: numerically when both are numeric, otherwise by
/// their string rendering. Containers are unordered.
#[must_use]
pub fn loose_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (as_number(left), as_number(right)) {
        return l.partial_cmp(&r);
    }
    Some(scalar_string(left)?.cmp(&scalar_string(right)?))
}

/// Renders a value for interpolation: strings bare, everything else as JSON.
#[must_use]
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), true)]
    #[case(json!(""), true)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    #[case(json!(" "), false)]
    #[case(json!(0), false)]
    #[case(json!(false), false)]
    fn emptiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_empty(&value), expected);
    }

    #[test]
    fn resolve_path_descends_objects_and_arrays() {
        let value = json!({"author": {"tags": ["a", "b"]}});
        assert_eq!(resolve_path(&value, &["author", "tags", "1"]), Some(&json!("b")));
        assert_eq!(resolve_path(&value, &["author", "missing"]), None);
        assert_eq!(resolve_path(&value, &["author", "tags", "x"]), None);
    }

    #[test]
    fn empty_path_resolves_to_root() {
        let value = json!({"a": 1});
        let segments: [&str; 0] = [];
        assert_eq!(resolve_path(&value, &segments), Some(&value));
    }

    #[rstest]
    #[case(json!(12), Some(12.0))]
    #[case(json!("12.5"), Some(12.5))]
    #[case(json!(" -3 "), Some(-3.0))]
    #[case(json!("12a"), None)]
    #[case(json!(true), None)]
    fn numbers(#[case] value: Value, #[case] expected: Option<f64>) {
        assert_eq!(as_number(&value), expected);
    }

    #[test]
    fn integers() {
        assert!(is_integer(&json!(4)));
        assert!(is_integer(&json!("-4")));
        assert!(!is_integer(&json!(4.5)));
        assert!(!is_integer(&json!("4.5")));
    }

    #[test]
    fn loose_comparisons() {
        assert!(loose_eq(&json!(100), &json!("100")));
        assert!(loose_eq(&json!(100), &json!(100.0)));
        assert!(loose_eq(&json!(true), &json!("1")));
        assert!(!loose_eq(&json!(false), &json!(100)));
        assert_eq!(loose_cmp(&json!("99"), &json!(100)), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(loose_cmp(&json!([1]), &json!(1)), None);
    }

    #[test]
    fn whole_bounds_stay_integral() {
        assert_eq!(number_value(20.0), json!(20));
        assert_eq!(number_value(-0.5), json!(-0.5));
    }
}
