//! Dotted-path field resolution and numeric coercion.
//!
//! Every "maybe-a-number" conversion in the crate goes through
//! [`coerce_number`]; every field lookup goes through [`resolve`]. Both
//! degrade to `None` instead of failing.

use std::cmp::Ordering;

use serde_json::Value;

static NULL: Value = Value::Null;

/// Resolve a dot-separated path inside a row.
///
/// An empty path yields the row itself. Each path segment steps into an
/// object key or, for arrays, a numeric index. The first missing step
/// yields `None`.
#[must_use]
pub fn resolve<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(row);
    }
    let mut current = row;
    for key in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve a path, treating any missing step as JSON null.
#[must_use]
pub fn resolve_or_null<'a>(row: &'a Value, path: &str) -> &'a Value {
    resolve(row, path).unwrap_or(&NULL)
}

/// Coerce a value to a finite `f64`, or `None`.
///
/// Null and blank strings are `None`. Numbers pass through when finite.
/// Strings are parsed as a whole; anything non-finite or unparseable is
/// `None`. Booleans, arrays, and objects never coerce.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// Equality with numeric awareness: `5` and `5.0` are the same key even
/// though their JSON representations differ.
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Relational comparison between two heterogeneous values.
///
/// Two strings compare lexicographically. Otherwise both sides must
/// coerce to numbers; mixed or uncoercible pairs are incomparable.
#[must_use]
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => match (coerce_number(a), coerce_number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    }
}

/// Total ordering over heterogeneous values, used by sort transforms.
///
/// `std` sorts detect (and panic on) comparators that are not total
/// orders, so sorting cannot reuse [`compare`]: lexicographic
/// string-vs-string mixed with numeric string-vs-number is not
/// transitive. Here numeric-coercible values order numerically and come
/// first, non-numeric strings follow lexicographically, and everything
/// else ties at the end so input order survives a stable sort.
#[must_use]
pub fn total_compare(a: &Value, b: &Value) -> Ordering {
    match (coerce_number(a), coerce_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => match (a, b) {
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::String(_), _) => Ordering::Less,
            (_, Value::String(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        },
    }
}

/// Human-readable form of a value used as a series key or trace name.
#[must_use]
pub fn display_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// String form used by substring matching: null becomes the empty string.
#[must_use]
pub fn contains_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
