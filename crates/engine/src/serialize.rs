//! Error instance to error object conversion
//!
//! ## Algorithm
//!
//! For each error instance:
//! 1. Normalize it, then call `beforeSerialize(instance)`
//! 2. Copy core properties and extra attributes into a fresh plain object,
//!    plus the packed `constructorArgs`
//! 3. Deep: recurse into every property value. Shallow: recurse into `cause`
//!    and `errors` only
//! 4. `transformObject(object, instance)`
//! 5. Apply `include` / `exclude`, then the JSON-safety filter
//! 6. `afterSerialize(instance, object)`
//!
//! Every recursive step extends the ancestry with the current node. A child
//! that is already an ancestor is omitted from the output.

use crate::args;
use crate::filter::{self, list_props};
use crate::hooks::Hook;
use crate::options::Options;
use errwire_core::{
    make_json_safe, normalize_exception, safe, Ancestry, Array, Depth, ErrorRef, Object, Value,
};

/// Serialize `value` according to `options`
pub(crate) fn serialize_value(value: &Value, options: &Options) -> Value {
    let value = if options.loose || value.is_error() {
        value.clone()
    } else {
        Value::Error(normalize_exception(value))
    };
    if options.shallow {
        serialize_shallow(&value, options, &Ancestry::root())
    } else {
        serialize_deep(&value, options, &Ancestry::root())
    }
}

/// Convert an error instance without walking into containers or extra
/// attributes. Other values are returned unchanged.
///
/// Only the top level of the result is JSON-safe. Extra attributes are kept
/// verbatim, so they may still hold error instances or references back to
/// the instance itself.
pub fn serialize_shallow(value: &Value, options: &Options, ancestry: &Ancestry<'_>) -> Value {
    if !value.is_error() {
        return value.clone();
    }
    let frame = ancestry.push(value);
    let error = normalize_exception(value);
    options
        .hooks
        .call(Hook::BeforeSerialize, &[Value::Error(error.clone())]);

    let object = build_object(&error);
    for name in ["cause", "errors"] {
        let Ok(child) = object.get(name) else {
            continue;
        };
        match child {
            Value::Undefined => {}
            Value::Array(items) if name == "errors" => {
                let items = items
                    .to_vec()
                    .iter()
                    .filter(|item| !frame.contains(item))
                    .map(|item| serialize_shallow(item, options, &frame))
                    .collect();
                let _ = object.set(name, Value::Array(Array::from_vec(items)));
            }
            child if frame.contains(&child) => {
                let _ = object.delete(name);
            }
            child => {
                let _ = object.set(name, serialize_shallow(&child, options, &frame));
            }
        }
    }

    finish(object, &error, options, Depth::Shallow)
}

/// Convert every error instance reachable from `value`, walking arrays,
/// plain objects and error properties.
pub fn serialize_deep(value: &Value, options: &Options, ancestry: &Ancestry<'_>) -> Value {
    let frame = ancestry.push(value);
    match value {
        Value::Error(_) => {
            let error = normalize_exception(value);
            options
                .hooks
                .call(Hook::BeforeSerialize, &[Value::Error(error.clone())]);
            let object = build_object(&error);
            let object = recurse_object(&Value::Object(object), options, &frame);
            finish(object, &error, options, Depth::Deep)
        }
        Value::Array(items) => Value::Array(Array::from_vec(
            items
                .to_vec()
                .iter()
                .filter(|item| !frame.contains(item))
                .map(|item| serialize_deep(item, options, &frame))
                .collect(),
        )),
        Value::Object(object) if value.is_plain_object() && object.own_keys().is_ok() => {
            Value::Object(recurse_object(value, options, &frame))
        }
        other => other.clone(),
    }
}

// Core properties, extra attributes and packed constructor arguments
fn build_object(error: &ErrorRef) -> Object {
    let source = Value::Error(error.clone());
    let object = Object::new();
    for name in list_props(&source) {
        if let Ok(value) = safe::get(&source, &name) {
            let _ = object.set(name, value);
        }
    }
    if let Ok(constructor_args) = safe::get(&source, "constructorArgs") {
        if let Some(packed) = args::pack(&constructor_args, &error.message()) {
            let _ = object.set("constructorArgs", packed);
        }
    }
    object
}

fn recurse_object(value: &Value, options: &Options, frame: &Ancestry<'_>) -> Object {
    let object = Object::new();
    for name in safe::list_keys(value) {
        let Ok(child) = safe::get(value, &name) else {
            continue;
        };
        if frame.contains(&child) {
            continue;
        }
        let _ = object.set(name, serialize_deep(&child, options, frame));
    }
    object
}

fn finish(object: Object, error: &ErrorRef, options: &Options, depth: Depth) -> Value {
    options.hooks.call(
        Hook::TransformObject,
        &[Value::Object(object.clone()), Value::Error(error.clone())],
    );
    let object = filter::apply_list(&object, options.include.as_deref(), options.exclude.as_deref());
    let object = make_json_safe(&Value::Object(object), depth);
    options
        .hooks
        .call(Hook::AfterSerialize, &[Value::Error(error.clone()), object.clone()]);
    object
}
