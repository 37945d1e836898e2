//! errwire - Convert live error instances to JSON-safe error objects and back
//!
//! # Quick Start
//!
//! ```
//! use errwire::{parse, serialize, ErrorRef, Options, Value};
//!
//! let error = ErrorRef::new("Could not connect");
//! error.set("code", "ECONNREFUSED");
//!
//! // Error instance -> plain, JSON-safe error object
//! let options = Options::default();
//! let object = serialize(&Value::Error(error), &options);
//! let json = object.to_json().unwrap();
//! assert_eq!(json["message"], "Could not connect");
//! assert_eq!(json["code"], "ECONNREFUSED");
//!
//! // Error object -> error instance
//! let parsed = parse(&Value::from(json), &options);
//! assert_eq!(parsed.as_error().unwrap().message(), "Could not connect");
//! ```
//!
//! # Architecture
//!
//! The host value model and the normalization / JSON-safety collaborators live
//! in `errwire-core`. The serializer, deserializer, options, hooks and class
//! registry live in `errwire-engine`. This crate re-exports both.

// Re-export the public API from errwire-engine
pub use errwire_engine::*;

// Re-export the value model from errwire-core
pub use errwire_core::{
    default_stack, make_json_safe, normalize_exception, safe, Absent, Ancestry, Array, Builtin,
    Depth, ErrorClass, ErrorRef, Function, Object, Property, PropertyKey, Symbol, Thrown, Value,
};
