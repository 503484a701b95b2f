//! Token search over parsed JSON values.

use serde_json::{Map, Value};

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Depth-first search for the first key in `keys`.
///
/// Object keys are visited in `Object.keys` order: array-index keys first in
/// ascending numeric order, then the rest in document order. A matching key
/// ends the search of its object even when its value is falsy; a nested
/// result is only taken when truthy, otherwise the walk moves on to the next
/// sibling. Nodes nested deeper than `max_depth` are not inspected.
pub fn deep_find<'a, K: AsRef<str>>(
    value: &'a Value,
    keys: &[K],
    max_depth: usize,
) -> Option<&'a Value> {
    find_at(value, keys, 0, max_depth)
}

fn find_at<'a, K: AsRef<str>>(
    value: &'a Value,
    keys: &[K],
    depth: usize,
    max_depth: usize,
) -> Option<&'a Value> {
    if depth > max_depth {
        return None;
    }

    match value {
        Value::Object(map) => {
            for (key, child) in ordered_entries(map) {
                if keys.iter().any(|k| k.as_ref() == key) {
                    return Some(child);
                }
                if let Some(found) = find_nested(child, keys, depth, max_depth) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => items
            .iter()
            .find_map(|child| find_nested(child, keys, depth, max_depth)),
        _ => None,
    }
}

fn find_nested<'a, K: AsRef<str>>(
    child: &'a Value,
    keys: &[K],
    depth: usize,
    max_depth: usize,
) -> Option<&'a Value> {
    if !matches!(child, Value::Object(_) | Value::Array(_)) {
        return None;
    }
    match find_at(child, keys, depth + 1, max_depth) {
        Some(found) if is_truthy(found) => Some(found),
        _ => None,
    }
}

/// Entries of `map` in the order JavaScript enumerates own string keys.
fn ordered_entries(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut indexed: Vec<(u32, &String, &Value)> = Vec::new();
    let mut named: Vec<(&String, &Value)> = Vec::new();
    for (key, child) in map {
        match array_index(key) {
            Some(index) => indexed.push((index, key, child)),
            None => named.push((key, child)),
        }
    }
    indexed.sort_by_key(|(index, _, _)| *index);
    indexed
        .into_iter()
        .map(|(_, key, child)| (key, child))
        .chain(named)
        .collect()
}

/// Canonical array index: decimal, no leading zero, below 2^32 - 1.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<u32>().ok().filter(|n| *n < u32::MAX)
}

/// Compact-token heuristic: exactly two dots, hence three segments.
///
/// Any dotted string such as a version number "1.2.3" also passes; the
/// result is a guess, not a validated JWT.
pub fn looks_like_compact_token(raw: &str) -> bool {
    raw.bytes().filter(|b| *b == b'.').count() == 2
}

/// Render a located auth-state value as a token.
///
/// Strings pass through and scalars are stringified. Objects and arrays are
/// rejected on purpose: a browser script would coerce them to text such as
/// "[object Object]", which is never a usable `idTokenHint`.
pub fn token_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
