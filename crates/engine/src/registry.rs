//! Error class resolution
//!
//! A name resolves in three tiers: the caller's class map, then the
//! well-known built-in names, then the base `Error` class.

use errwire_core::{Builtin, ErrorClass};
use std::collections::HashMap;

/// Caller-supplied name to class map (`classes` / `types` option)
pub type ClassMap = HashMap<String, ErrorClass>;

/// Error names recognized without registration. `DOMException` is recognized
/// but not provided by this runtime, so it resolves to the base class.
pub const WELL_KNOWN: [&str; 9] = [
    "Error",
    "ReferenceError",
    "TypeError",
    "SyntaxError",
    "RangeError",
    "URIError",
    "EvalError",
    "AggregateError",
    "DOMException",
];

/// Outcome of a name lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Found in the caller's class map
    Registered(ErrorClass),
    /// A well-known built-in available at runtime
    Builtin(Builtin),
    /// Fallback to the base `Error` class
    Default,
}

impl Resolved {
    /// The class to construct
    pub fn class(&self) -> ErrorClass {
        match self {
            Resolved::Registered(class) => class.clone(),
            Resolved::Builtin(builtin) => builtin.class(),
            Resolved::Default => ErrorClass::base(),
        }
    }
}

/// Resolve an error name. Never fails.
pub fn resolve(name: Option<&str>, classes: &ClassMap) -> Resolved {
    let Some(name) = name else {
        return Resolved::Default;
    };
    if let Some(class) = classes.get(name) {
        return Resolved::Registered(class.clone());
    }
    if WELL_KNOWN.contains(&name) {
        if let Some(builtin) = Builtin::from_name(name) {
            return Resolved::Builtin(builtin);
        }
    }
    Resolved::Default
}
