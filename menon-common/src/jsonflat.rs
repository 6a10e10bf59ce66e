//! JSON flatten/normalize helpers
//!
//! Record columns such as `pricing`, `product_details` and `photos` hold
//! arbitrary JSON, sometimes stored as JSON-encoded text (occasionally twice).
//! These helpers turn such values into flat `key -> leaf` rows for display and
//! editing, and turn edited rows back into a one-level JSON object.
//!
//! Key syntax: nested object keys are joined with `.`, array indices are
//! rendered as `key[i]`.
//!
//! # Examples
//! ```
//! use menon_common::jsonflat::flatten;
//! use serde_json::json;
//!
//! let rows = flatten(&json!({"a": {"b": 1, "c": [2, 3]}}));
//! let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
//! assert_eq!(keys, ["a.b", "a.c[0]", "a.c[1]"]);
//! ```

use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;

/// Key used for a primitive flattened without a prefix
pub const PRIMITIVE_KEY: &str = "value";

/// A JSON value that is not a container
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Leaf {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Leaf {
    /// Convert a JSON value into a leaf; `None` for arrays and objects
    pub fn from_value(value: &Value) -> Option<Leaf> {
        match value {
            Value::Null => Some(Leaf::Null),
            Value::Bool(b) => Some(Leaf::Bool(*b)),
            Value::Number(n) => Some(Leaf::Number(n.clone())),
            Value::String(s) => Some(Leaf::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Text placed in an editable value input (null shows as empty)
    pub fn input_text(&self) -> String {
        match self {
            Leaf::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Null => f.write_str("null"),
            Leaf::Bool(b) => write!(f, "{}", b),
            Leaf::Number(n) => write!(f, "{}", n),
            Leaf::String(s) => f.write_str(s),
        }
    }
}

impl From<Leaf> for Value {
    fn from(leaf: Leaf) -> Self {
        match leaf {
            Leaf::Null => Value::Null,
            Leaf::Bool(b) => Value::Bool(b),
            Leaf::Number(n) => Value::Number(n),
            Leaf::String(s) => Value::String(s),
        }
    }
}

/// One flattened `(dotted-path key, leaf)` pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatEntry {
    pub key: String,
    pub value: Leaf,
}

impl FlatEntry {
    pub fn new(key: impl Into<String>, value: Leaf) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Flatten a JSON value into ordered `(key, leaf)` pairs
///
/// Traversal is depth-first; object entries follow document order and array
/// elements follow index order. Every leaf of the input appears exactly once.
/// A top-level `null` yields no rows, a top-level primitive yields a single
/// row keyed [`PRIMITIVE_KEY`].
pub fn flatten(value: &Value) -> Vec<FlatEntry> {
    flatten_with_prefix(value, "")
}

/// Flatten with every key rooted under `prefix`
pub fn flatten_with_prefix(value: &Value, prefix: &str) -> Vec<FlatEntry> {
    let mut out = Vec::new();
    flatten_into(value, prefix, &mut out);
    out
}

fn flatten_into(value: &Value, prefix: &str, out: &mut Vec<FlatEntry>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                push_child(item, format!("{}[{}]", prefix, i), out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                push_child(v, key, out);
            }
        }
        primitive => {
            let key = if prefix.is_empty() { PRIMITIVE_KEY } else { prefix };
            if let Some(leaf) = Leaf::from_value(primitive) {
                out.push(FlatEntry::new(key, leaf));
            }
        }
    }
}

// Nulls inside containers are leaves and must be kept.
fn push_child(item: &Value, key: String, out: &mut Vec<FlatEntry>) {
    match Leaf::from_value(item) {
        Some(leaf) => out.push(FlatEntry::new(key, leaf)),
        None => flatten_into(item, &key, out),
    }
}

/// Decode a possibly JSON-encoded value
///
/// Strings are parsed as JSON; text that is not valid JSON is returned
/// unchanged as a string. Structured values pass through untouched. Never fails.
pub fn parse_if_encoded(raw: &Value) -> Value {
    match raw {
        Value::String(text) => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
        }
        other => other.clone(),
    }
}

/// Recover an ordered list of strings (e.g. photo URLs) from any encoding
///
/// Accepts a single string, arrays, objects (values only, keys ignored) and
/// any nesting of those. Whitespace-only strings are skipped; order and
/// duplicates are preserved.
pub fn normalize_string_list(raw: &Value) -> Vec<String> {
    match parse_if_encoded(raw) {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        parsed => {
            let mut out = Vec::new();
            collect_strings(&parsed, &mut out);
            out
        }
    }
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.trim().is_empty() => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|item| collect_strings(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_strings(item, out)),
        _ => {}
    }
}

/// Build a one-level JSON object from edited `(key, text)` rows
///
/// Rows with an empty key are dropped. Values are trimmed and coerced to
/// numbers when the whole text is numeric. On duplicate keys the last value
/// wins while the first key position is kept. Returns `None` when no row
/// survives.
pub fn build_from_rows<I, K, V>(rows: I) -> Option<Map<String, Value>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut map = Map::new();
    for (key, text) in rows {
        let key = key.as_ref().trim();
        if key.is_empty() {
            continue;
        }
        map.insert(key.to_string(), coerce_text(text.as_ref().trim()));
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// Coerce trimmed input text to a JSON number when it is numeric
///
/// Integers stay integers; other finite decimal notations become floats.
/// `inf`/`nan` spellings and empty text stay strings.
pub fn coerce_text(text: &str) -> Value {
    if text.is_empty() {
        return Value::String(String::new());
    }
    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(i.into());
    }
    match text.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(text.to_string()),
    }
}

/// True when saving `value` through flat rows would drop structure
///
/// That is the case for arrays and for objects holding any container.
pub fn loses_structure_when_flattened(value: &Value) -> bool {
    match parse_if_encoded(value) {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => map
            .values()
            .any(|v| matches!(v, Value::Array(_) | Value::Object(_))),
        _ => false,
    }
}

/// Rows for a read-only key/value table of a JSON column
pub fn detail_rows(raw: &Value) -> Vec<FlatEntry> {
    flatten(&parse_if_encoded(raw))
}

/// One-line summary of a pricing column: its first entry as `key: value`
///
/// Nested values are elided as `key: …`. Non-object values render as their
/// text. Returns `None` for null, empty text and empty containers.
pub fn price_summary(raw: &Value) -> Option<String> {
    match parse_if_encoded(raw) {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Object(map) => map.iter().next().map(|(k, v)| entry_summary(k, v)),
        Value::Array(items) => items.first().map(|v| entry_summary("0", v)),
        primitive => Leaf::from_value(&primitive).map(|leaf| leaf.to_string()),
    }
}

fn entry_summary(key: &str, value: &Value) -> String {
    match Leaf::from_value(value) {
        Some(leaf) => format!("{}: {}", key, leaf),
        None => format!("{}: …", key),
    }
}

/// Editable `(label, url)` rows for a photos column
///
/// Objects yield their entries. Legacy arrays become `photo_1`, `photo_2`, …
/// taking the string itself or an object's `url`/`src` field. A single string
/// becomes `photo_1`. Anything else yields no rows.
pub fn photo_rows(raw: &Value) -> Vec<(String, String)> {
    match parse_if_encoded(raw) {
        Value::Object(map) => map
            .into_iter()
            .map(|(label, v)| (label, value_text(&v)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (format!("photo_{}", i + 1), legacy_photo_url(item)))
            .collect(),
        Value::String(url) => vec![("photo_1".to_string(), url)],
        _ => Vec::new(),
    }
}

fn legacy_photo_url(item: &Value) -> String {
    match item {
        Value::String(url) => url.clone(),
        Value::Object(map) => ["url", "src"]
            .iter()
            .filter_map(|field| map.get(*field).and_then(Value::as_str))
            .find(|url| !url.is_empty())
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn value_text(value: &Value) -> String {
    match Leaf::from_value(value) {
        Some(leaf) => leaf.input_text(),
        None => value.to_string(),
    }
}
