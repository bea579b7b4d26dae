//! Safe extraction of scalar values from provider statistics documents.
//!
//! Provider documents have no enforced schema: any segment of any path may
//! be missing, `null`, or of an unexpected type. Every accessor here walks
//! the path one segment at a time and falls back to the caller's default on
//! the first miss. Nothing in this module returns an error.

use serde_json::Value;

/// Walk `path` into `doc`, returning the leaf if every segment resolves.
///
/// Object segments are looked up by key; array segments by decimal index.
/// A `null` leaf is treated the same as a missing one.
pub fn lookup<'a>(doc: Option<&'a Value>, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(doc?, |node, segment| match node {
            Value::Object(map) => map.get(*segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .filter(|leaf| !leaf.is_null())
}

/// Same as [`lookup`] with a dotted path (`"fixtures.played.total"`).
pub fn lookup_dotted<'a>(doc: Option<&'a Value>, path: &str) -> Option<&'a Value> {
    let segments: Vec<&str> = path.split('.').collect();
    lookup(doc, &segments)
}

/// Coerce a leaf to a float. Numeric strings (the provider reports averages
/// as `"1.5"`) are parsed.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Coerce a leaf to an integer count. Integral floats and numeric strings
/// are accepted; fractional values are not.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Float at `path`, or `default`.
pub fn float_at(doc: Option<&Value>, path: &[&str], default: f64) -> f64 {
    lookup(doc, path).and_then(as_f64).unwrap_or(default)
}

/// Integer count at `path`, or `default`.
pub fn count_at(doc: Option<&Value>, path: &[&str], default: i64) -> i64 {
    lookup(doc, path).and_then(as_i64).unwrap_or(default)
}

/// String at `path`, or `default`. Non-string leaves fall back as well.
pub fn str_at<'a>(doc: Option<&'a Value>, path: &[&str], default: &'a str) -> &'a str {
    lookup(doc, path).and_then(Value::as_str).unwrap_or(default)
}

/// Boolean at `path`; anything other than `true` reads as `false`.
pub fn flag_at(doc: Option<&Value>, path: &[&str]) -> bool {
    lookup(doc, path).and_then(Value::as_bool).unwrap_or(false)
}

/// A statistics document counts as present only if it is a non-empty object.
pub fn is_present(doc: Option<&Value>) -> bool {
    matches!(doc, Some(Value::Object(map)) if !map.is_empty())
}
