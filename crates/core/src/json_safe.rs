//! JSON-safety filter
//!
//! Removes every value a JSON encoder would reject: `undefined`, functions,
//! classes, symbols, bigints, non-finite floats, throwing getters, revoked
//! objects, symbol keys and cyclic references. Invalid values are dropped,
//! never replaced.
//!
//! An object or error with a callable `toJSON` is replaced by the result of
//! calling it, the way a JSON encoder would. A `toJSON` that throws makes the
//! value absent.

use crate::ancestry::Ancestry;
use crate::object::{Array, Object, PropertyKey};
use crate::value::Value;
use std::panic::{self, AssertUnwindSafe};
use tracing::trace;

/// How far the filter descends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Only the top-level properties or items are inspected
    Shallow,
    /// Every nested value is inspected
    Deep,
}

/// Return a JSON-safe copy of `value`.
///
/// A top-level value that is itself invalid becomes `Undefined`. Never throws.
pub fn make_json_safe(value: &Value, depth: Depth) -> Value {
    match depth {
        Depth::Shallow => shallow(value),
        Depth::Deep => deep(value, &Ancestry::root()).unwrap_or(Value::Undefined),
    }
}

fn shallow(value: &Value) -> Value {
    let Some(value) = resolve_to_json(value) else {
        return Value::Undefined;
    };
    match &value {
        v if v.is_json_unsafe_leaf() => Value::Undefined,
        Value::Array(array) => Value::Array(Array::from_vec(
            array
                .to_vec()
                .iter()
                .filter_map(shallow_item)
                .collect(),
        )),
        Value::Object(_) | Value::Error(_) => {
            let Some(entries) = readable_entries(&value) else {
                return Value::Undefined;
            };
            Value::Object(Object::from_entries(
                entries
                    .into_iter()
                    .filter_map(|(name, item)| shallow_item(&item).map(|item| (name, item))),
            ))
        }
        other => other.clone(),
    }
}

// Top-level item: `toJSON` is resolved but the result is not descended into
fn shallow_item(item: &Value) -> Option<Value> {
    resolve_to_json(item).filter(|item| !item.is_json_unsafe_leaf())
}

fn deep(value: &Value, ancestry: &Ancestry<'_>) -> Option<Value> {
    let value = resolve_to_json(value)?;
    filter_deep(&value, ancestry)
}

fn filter_deep(value: &Value, ancestry: &Ancestry<'_>) -> Option<Value> {
    if value.is_json_unsafe_leaf() || ancestry.contains(value) {
        return None;
    }
    let frame = ancestry.push(value);
    match value {
        Value::Array(array) => Some(Value::Array(Array::from_vec(
            array
                .to_vec()
                .iter()
                .filter_map(|item| deep(item, &frame))
                .collect(),
        ))),
        Value::Object(_) | Value::Error(_) => {
            let entries = readable_entries(value)?;
            Some(Value::Object(Object::from_entries(
                entries
                    .into_iter()
                    .filter_map(|(name, item)| deep(&item, &frame).map(|item| (name, item))),
            )))
        }
        other => Some(other.clone()),
    }
}

// Result of `value.toJSON()` if `value` has one, else `value` itself.
// `None` if the call throws or panics.
fn resolve_to_json(value: &Value) -> Option<Value> {
    if !matches!(value, Value::Object(_) | Value::Error(_)) {
        return Some(value.clone());
    }
    let Ok(Value::Function(to_json)) = value.get("toJSON") else {
        return Some(value.clone());
    };
    match panic::catch_unwind(AssertUnwindSafe(|| to_json.call(&[]))) {
        Ok(Ok(resolved)) => Some(resolved),
        Ok(Err(thrown)) => {
            trace!(target: "errwire::safe", error = %thrown, "toJSON threw, dropping value");
            None
        }
        Err(_) => {
            trace!(target: "errwire::safe", "toJSON panicked, dropping value");
            None
        }
    }
}

// Own enumerable string-keyed entries; `None` for a revoked object
fn readable_entries(value: &Value) -> Option<Vec<(String, Value)>> {
    let keys = match value {
        Value::Object(object) => object.own_keys().ok()?,
        Value::Error(error) => error.own_keys(),
        _ => return Some(Vec::new()),
    };
    Some(
        keys.into_iter()
            .filter_map(|(key, enumerable)| match key {
                PropertyKey::Name(name) if enumerable => Some(name),
                _ => None,
            })
            .filter_map(|name| value.get(&name).ok().map(|item| (name, item)))
            .collect(),
    )
}
