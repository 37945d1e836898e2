//! Exception normalization
//!
//! [`normalize_exception`] turns any value into an error instance with a
//! canonical shape:
//! - `name`, `message` and `stack` are strings
//! - `cause` is an error instance, or absent
//! - `errors` is an array of error instances, or absent
//! - core properties are non-enumerable
//!
//! Error instances are repaired in place so identity is kept. Anything else
//! is converted into a fresh `Error`.

use crate::instance::{default_stack, ErrorRef};
use crate::object::{Array, Property};
use crate::safe::{self, list_keys};
use crate::value::Value;
use std::collections::HashSet;

/// Normalize any value into a well-formed error instance. Never throws.
pub fn normalize_exception(value: &Value) -> ErrorRef {
    Normalizer::default().normalize(value)
}

#[derive(Default)]
struct Normalizer {
    // Errors already repaired during this call
    seen: HashSet<usize>,
}

impl Normalizer {
    fn normalize(&mut self, value: &Value) -> ErrorRef {
        match value {
            Value::Error(error) => {
                if self.seen.insert(error.id()) {
                    self.repair(error);
                }
                error.clone()
            }
            other => self.convert(other),
        }
    }

    fn repair(&mut self, error: &ErrorRef) {
        let target = Value::Error(error.clone());

        match safe::get(&target, "name") {
            Ok(Value::String(name)) if !name.is_empty() => {
                if error.has_own("name") {
                    error.define("name", Property::hidden(name));
                }
            }
            _ => {
                error.delete("name");
            }
        }

        let message = match safe::get(&target, "message") {
            Ok(Value::String(message)) => message,
            _ => String::new(),
        };
        error.define("message", Property::hidden(message.clone()));

        let stack = match safe::get(&target, "stack") {
            Ok(Value::String(stack)) if !stack.is_empty() => stack,
            _ => default_stack(&error.name(), &message),
        };
        error.define("stack", Property::hidden(stack));

        if error.has_own("cause") {
            match safe::get(&target, "cause") {
                Ok(Value::Undefined) => {
                    error.delete("cause");
                }
                Ok(cause) => {
                    let cause = self.normalize(&cause);
                    error.define("cause", Property::hidden(cause));
                }
                Err(_) => {
                    error.define("cause", Property::hidden(ErrorRef::new("")));
                }
            }
        }

        if error.has_own("errors") {
            match safe::get(&target, "errors") {
                Ok(Value::Array(items)) => {
                    let items = self.normalize_all(&items);
                    error.define("errors", Property::hidden(items));
                }
                _ => {
                    error.delete("errors");
                }
            }
        }
    }

    fn normalize_all(&mut self, items: &Array) -> Array {
        Array::from_vec(
            items
                .to_vec()
                .iter()
                .map(|item| Value::Error(self.normalize(item)))
                .collect(),
        )
    }

    fn convert(&mut self, value: &Value) -> ErrorRef {
        match value {
            Value::String(message) => ErrorRef::new(message.clone()),
            Value::Object(_) => self.convert_object(value),
            other => ErrorRef::new(other.to_js_string()),
        }
    }

    // Objects contribute their core properties and their safe extras
    fn convert_object(&mut self, object: &Value) -> ErrorRef {
        let message = match safe::get(object, "message") {
            Ok(Value::String(message)) => message,
            _ => String::new(),
        };
        let error = ErrorRef::new(message);

        for name in list_keys(object) {
            if matches!(name.as_str(), "name" | "message" | "stack" | "cause" | "errors") {
                continue;
            }
            if let Ok(value) = safe::get(object, &name) {
                error.set(name, value);
            }
        }
        for core in ["name", "stack", "cause", "errors"] {
            if let Ok(value) = safe::get(object, core) {
                if !value.is_undefined() {
                    error.define(core, Property::hidden(value));
                }
            }
        }

        self.repair(&error);
        self.seen.insert(error.id());
        error
    }
}
