//! Non-throwing property access
//!
//! Every read goes through [`get`], which turns a throwing getter or a revoked
//! object into [`Absent`] instead of a [`Thrown`](crate::Thrown). Key listings
//! apply the same check, so a key whose getter throws is not listed at all.

use crate::object::PropertyKey;
use crate::value::Value;
use tracing::trace;

/// Marker for a property that is missing or cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Absent;

/// Read a string-named property.
///
/// Returns `Err(Absent)` if `value` has no such property (own, or the
/// inherited `name` of an error instance) or if reading it throws.
pub fn get(value: &Value, name: &str) -> Result<Value, Absent> {
    let found = match value {
        Value::Object(object) => object.has_own(name).unwrap_or(false),
        Value::Error(error) => error.has_own(name) || name == "name",
        _ => false,
    };
    if !found {
        return Err(Absent);
    }
    value.get(name).map_err(|thrown| {
        trace!(target: "errwire::safe", property = name, error = %thrown, "unsafe property read");
        Absent
    })
}

/// Read a property, treating missing, throwing and `Undefined` alike
pub fn get_defined(value: &Value, name: &str) -> Option<Value> {
    get(value, name).ok().filter(|v| !v.is_undefined())
}

/// Whether reading `name` on `value` does not throw
pub fn is_safe(value: &Value, name: &str) -> bool {
    value.get(name).is_ok()
}

/// Own, enumerable, string-named keys whose read does not throw
pub fn list_keys(value: &Value) -> Vec<String> {
    let keys = match value {
        Value::Object(object) => object.own_keys().unwrap_or_default(),
        Value::Error(error) => error.own_keys(),
        _ => return Vec::new(),
    };
    keys.into_iter()
        .filter_map(|(key, enumerable)| match key {
            PropertyKey::Name(name) if enumerable => Some(name),
            _ => None,
        })
        .filter(|name| is_safe(value, name))
        .collect()
}
