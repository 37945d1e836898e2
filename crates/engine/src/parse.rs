//! Error object to error instance conversion
//!
//! Deep parsing converts children (containers, `cause`, `errors`) before
//! their parent, so hooks run bottom-up. Each error object then goes through:
//! 1. `beforeParse(object)`
//! 2. Construction through the resolved class
//! 3. Core properties copied as non-enumerable, extra attributes as
//!    enumerable
//! 4. Normalization
//! 5. `transformInstance(instance, object)`, then `afterParse(object, instance)`

use crate::args;
use crate::filter::{extra_props, UNSET_CORE_PROPS};
use crate::hooks::Hook;
use crate::options::Options;
use crate::registry::{self, Resolved};
use errwire_core::{
    default_stack, normalize_exception, safe, Ancestry, Array, Builtin, ErrorClass, ErrorRef,
    Object, Property, Value,
};
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Parse `value` according to `options`
pub(crate) fn parse_value(value: &Value, options: &Options) -> Value {
    let value = if options.loose || value.is_error() || is_error_object(value) {
        value.clone()
    } else {
        coerce(value)
    };
    if options.shallow {
        parse_shallow(&value, options, &Ancestry::root())
    } else {
        parse_deep(&value, options, &Ancestry::root())
    }
}

/// Whether `value` has the error object shape: a plain object with a string
/// `message`
pub fn is_error_object(value: &Value) -> bool {
    value.is_plain_object() && matches!(safe::get(value, "message"), Ok(Value::String(_)))
}

// Turn arbitrary input into an error object
fn coerce(value: &Value) -> Value {
    if !value.is_plain_object() {
        return Value::object([("message", Value::String(value.to_js_string()))]);
    }
    let object = Object::new();
    for name in safe::list_keys(value) {
        if let Ok(item) = safe::get(value, &name) {
            let _ = object.set(name, item);
        }
    }
    let message = match safe::get(value, "message") {
        Ok(Value::Undefined) | Err(_) => String::new(),
        Ok(other) => other.to_js_string(),
    };
    let _ = object.set("message", message);
    Value::Object(object)
}

/// Convert an error object into an error instance without walking into
/// containers. Other values are returned unchanged.
pub fn parse_shallow(value: &Value, options: &Options, ancestry: &Ancestry<'_>) -> Value {
    match value {
        Value::Object(object) if is_error_object(value) => {
            Value::Error(parse_error_object(object, options, &ancestry.push(value)))
        }
        other => other.clone(),
    }
}

/// Convert every error object reachable from `value`, children first
pub fn parse_deep(value: &Value, options: &Options, ancestry: &Ancestry<'_>) -> Value {
    let frame = ancestry.push(value);
    let value = match value {
        Value::Array(items) => Value::Array(Array::from_vec(
            items
                .to_vec()
                .iter()
                .filter(|item| !frame.contains(item))
                .map(|item| parse_deep(item, options, &frame))
                .collect(),
        )),
        Value::Object(object) if value.is_plain_object() && object.own_keys().is_ok() => {
            let object = Object::new();
            for name in safe::list_keys(value) {
                let Ok(child) = safe::get(value, &name) else {
                    continue;
                };
                if !frame.contains(&child) {
                    let _ = object.set(name, parse_deep(&child, options, &frame));
                }
            }
            Value::Object(object)
        }
        other => return other.clone(),
    };
    parse_shallow(&value, options, ancestry)
}

fn parse_error_object(object: &Object, options: &Options, frame: &Ancestry<'_>) -> ErrorRef {
    let source = Value::Object(object.clone());
    options.hooks.call(Hook::BeforeParse, &[source.clone()]);

    let error = create_error(&source, options);
    set_core_props(&error, &source, options, frame);
    for name in extra_props(&source) {
        if let Ok(value) = safe::get(&source, &name) {
            error.set(name, value);
        }
    }

    let error = normalize_exception(&Value::Error(error));
    options.hooks.call(
        Hook::TransformInstance,
        &[Value::Error(error.clone()), source.clone()],
    );
    options
        .hooks
        .call(Hook::AfterParse, &[source, Value::Error(error.clone())]);
    error
}

fn set_core_props(error: &ErrorRef, source: &Value, options: &Options, frame: &Ancestry<'_>) {
    for name in UNSET_CORE_PROPS {
        let Some(value) = safe::get_defined(source, name) else {
            continue;
        };
        let value = match (name, value) {
            (_, child) if frame.contains(&child) => continue,
            ("cause", child) => parse_shallow(&child, options, frame),
            ("errors", Value::Array(items)) => Value::Array(Array::from_vec(
                items
                    .to_vec()
                    .iter()
                    .filter(|item| !frame.contains(item))
                    .map(|item| parse_shallow(item, options, frame))
                    .collect(),
            )),
            (_, other) => other,
        };
        error.define(name, Property::hidden(value));
    }
}

/// Build the instance for an error object.
///
/// With `constructorArgs` or a `transformArgs` hook, the resolved class is
/// constructed with the replayed arguments, falling back to a base `Error`
/// if construction throws. Otherwise a base `Error` is retagged to the
/// resolved class without running its constructor.
fn create_error(source: &Value, options: &Options) -> ErrorRef {
    let name = match safe::get(source, "name") {
        Ok(Value::String(name)) => Some(name),
        _ => None,
    };
    let message = match safe::get(source, "message") {
        Ok(Value::String(message)) => message,
        _ => String::new(),
    };
    let resolved = registry::resolve(name.as_deref(), &options.classes);
    let class = resolved.class();

    let packed = safe::get_defined(source, "constructorArgs");
    if packed.is_none() && !options.hooks.has(Hook::TransformArgs) {
        return retag(&class, &message);
    }

    let args = packed
        .and_then(|packed| args::unpack(&packed, &message))
        .unwrap_or_else(|| default_args(&class, &message));
    let args = Array::from_vec(args);
    options.hooks.call(
        Hook::TransformArgs,
        &[
            Value::Array(args.clone()),
            source.clone(),
            Value::Class(class.clone()),
        ],
    );
    construct(&class, &resolved, &args.to_vec(), &message)
}

fn retag(class: &ErrorClass, message: &str) -> ErrorRef {
    let error = ErrorRef::new(message);
    if class.builtin() != Some(Builtin::Error) {
        error.set_class(class);
        error.define("stack", Property::hidden(default_stack(class.name(), message)));
    }
    error
}

fn default_args(class: &ErrorClass, message: &str) -> Vec<Value> {
    if class.is_subclass_of(&Builtin::AggregateError.class()) {
        vec![Value::array(Vec::new()), Value::from(message)]
    } else {
        vec![Value::from(message)]
    }
}

fn construct(class: &ErrorClass, resolved: &Resolved, args: &[Value], message: &str) -> ErrorRef {
    match panic::catch_unwind(AssertUnwindSafe(|| class.construct(args))) {
        Ok(Ok(error)) => error,
        Ok(Err(thrown)) => {
            debug!(target: "errwire::parse", class = class.name(), ?resolved, error = %thrown, "Constructor threw, using Error");
            ErrorRef::new(message)
        }
        Err(_) => {
            debug!(target: "errwire::parse", class = class.name(), ?resolved, "Constructor panicked, using Error");
            ErrorRef::new(message)
        }
    }
}
