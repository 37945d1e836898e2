//! Property selection
//!
//! Decides which properties of an error instance or error object are emitted,
//! and applies the `include` / `exclude` options.

use errwire_core::{safe, Object, Value};

/// Property that is always kept by `include` and cannot be excluded
pub const REQUIRED_PROPERTY: &str = "message";

/// Core properties set by error constructors. Never copied from an error
/// object during parsing.
pub const SET_CORE_PROPS: [&str; 2] = ["name", "message"];

/// Core properties copied as non-enumerable during parsing
pub const UNSET_CORE_PROPS: [&str; 8] = [
    "stack",
    "cause",
    "errors",
    "lineNumber",
    "columnNumber",
    "fileName",
    "line",
    "column",
];

/// Properties never copied as extra attributes
pub const IGNORED_PROPS: [&str; 2] = ["toJSON", "constructorArgs"];

/// Whether `name` is a core property (serialized even if non-enumerable)
pub fn is_core(name: &str) -> bool {
    SET_CORE_PROPS.contains(&name) || UNSET_CORE_PROPS.contains(&name)
}

fn is_ignored(name: &str) -> bool {
    IGNORED_PROPS.contains(&name)
}

fn core_props() -> impl Iterator<Item = &'static str> {
    SET_CORE_PROPS.into_iter().chain(UNSET_CORE_PROPS)
}

/// Properties to emit: core properties first, then extra attributes.
///
/// Extra attributes are own, enumerable, string-keyed and safe to read. Every
/// listed property reads as a defined value.
pub fn list_props(value: &Value) -> Vec<String> {
    core_props()
        .filter(|name| safe::get_defined(value, name).is_some())
        .map(str::to_string)
        .chain(extra_props(value))
        .collect()
}

/// Extra attributes: own, enumerable, safe, defined, neither core nor ignored
pub fn extra_props(value: &Value) -> Vec<String> {
    safe::list_keys(value)
        .into_iter()
        .filter(|name| !is_core(name) && !is_ignored(name))
        .filter(|name| safe::get_defined(value, name).is_some())
        .collect()
}

/// Apply `include` then `exclude` to an error object.
///
/// Returns the same object when neither list is set.
pub fn apply_list(object: &Object, include: Option<&[String]>, exclude: Option<&[String]>) -> Object {
    if include.is_none() && exclude.is_none() {
        return object.clone();
    }
    let source = Value::Object(object.clone());
    let filtered = Object::new();
    for name in list_props(&source) {
        if !is_included(&name, include) || is_excluded(&name, exclude) {
            continue;
        }
        if let Ok(value) = safe::get(&source, &name) {
            // fresh plain object, cannot throw
            let _ = filtered.set(name, value);
        }
    }
    filtered
}

fn is_included(name: &str, include: Option<&[String]>) -> bool {
    match include {
        None => true,
        Some(include) => name == REQUIRED_PROPERTY || include.iter().any(|n| n == name),
    }
}

fn is_excluded(name: &str, exclude: Option<&[String]>) -> bool {
    match exclude {
        None => false,
        Some(exclude) => name != REQUIRED_PROPERTY && exclude.iter().any(|n| n == name),
    }
}
