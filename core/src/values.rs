//! Tolerant access to dynamic JSON structures.
//!
//! # Design
//! Settings and other dynamic payloads vary in shape between responses: the
//! same key may hold a scalar, a flat object, or arbitrarily nested maps.
//! The probes here never fail — absent keys and mismatched shapes yield
//! empty defaults, and degradations are logged rather than surfaced as parse
//! errors. Hard failures are reserved for typed field accessors, which know
//! which shape a kind tag promises.

use std::sync::OnceLock;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Normalize a dynamic settings payload into a generic key→JSON map.
///
/// Objects yield their entries; an absent or `null` payload yields an empty
/// map. Any other shape is flagged and treated as empty.
pub fn settings_map(value: Option<&Value>) -> Map<String, Value> {
    match value {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            tracing::warn!(found = describe(other), "expected a settings object, treating as empty");
            Map::new()
        }
    }
}

/// serde adapter: deserialize any JSON shape into a settings map, degrading
/// non-objects to empty per the normalization rules.
pub fn lenient_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(settings_map(value.as_ref()))
}

/// serde adapter for `Option<Map>` fields where "never present" and "present
/// but empty" are distinct states.
pub fn lenient_optional_map<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => {
            tracing::warn!(found = describe(&other), "expected a settings object, treating as absent");
            Ok(None)
        }
    }
}

/// Short label for a JSON value's shape, used in diagnostics.
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

/// Probing helpers over [`serde_json::Value`] that default instead of
/// failing, so accessors can walk structures whose shape varies.
pub trait ValueExt {
    /// String at `key`, if present and actually a string.
    fn str_of(&self, key: &str) -> Option<&str>;
    fn bool_of(&self, key: &str) -> Option<bool>;
    fn u64_of(&self, key: &str) -> Option<u64>;
    /// Object at `key`; absent or mismatched shapes yield an empty map.
    fn map_of(&self, key: &str) -> &Map<String, Value>;
    /// Array at `key`; absent or mismatched shapes yield an empty slice.
    fn array_of(&self, key: &str) -> &[Value];
}

impl ValueExt for Value {
    fn str_of(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn bool_of(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn u64_of(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    fn map_of(&self, key: &str) -> &Map<String, Value> {
        self.get(key)
            .and_then(Value::as_object)
            .unwrap_or_else(|| empty_map())
    }

    fn array_of(&self, key: &str) -> &[Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
