//! Error types for the host value model
//!
//! Getters, native functions and error constructors can "throw". A throw is
//! carried as a [`Thrown`] value instead of unwinding, so every caller gets an
//! explicit `Result` to handle.

use crate::instance::{Builtin, ErrorRef};
use crate::value::Value;
use thiserror::Error;

/// Result type alias for operations that may throw a host value
pub type Result<T> = std::result::Result<T, Thrown>;

/// A value thrown by a getter, function or constructor
#[derive(Debug, Clone, Error)]
#[error("uncaught {}", describe(.0))]
pub struct Thrown(pub Value);

impl Thrown {
    /// Throw an arbitrary value
    pub fn new(value: impl Into<Value>) -> Self {
        Thrown(value.into())
    }

    /// Throw a fresh `Error` instance with the given message
    pub fn error(message: impl Into<String>) -> Self {
        Thrown(Value::Error(ErrorRef::new(message)))
    }

    /// Throw a fresh `TypeError` instance with the given message
    pub fn type_error(message: impl Into<String>) -> Self {
        Thrown(Value::Error(ErrorRef::with_class(
            &Builtin::TypeError.class(),
            message,
        )))
    }

    /// The thrown value
    pub fn value(&self) -> &Value {
        &self.0
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Error(error) => {
            let message = error.message();
            if message.is_empty() {
                error.name()
            } else {
                format!("{}: {}", error.name(), message)
            }
        }
        other => other.to_js_string(),
    }
}
