//! Core types for errwire
//!
//! This crate defines the host value model the serializer works on, plus the
//! two collaborators it calls at its boundaries:
//! - Value: Unified enum for every value in an error graph
//! - Object, Array, Function, Symbol: Identity-bearing containers and leaves
//! - ErrorRef, ErrorClass, Builtin: Live error instances and their classes
//! - Thrown: What getters, functions and constructors throw
//! - safe: Non-throwing property access
//! - Ancestry: Identity stack used to break cycles
//! - normalize_exception: Canonical error shape
//! - make_json_safe: Removal of values a JSON encoder rejects

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod ancestry;
pub mod error;
pub mod instance;
pub mod json_safe;
pub mod normalize;
pub mod object;
pub mod safe;
pub mod value;

// Re-export commonly used types
pub use ancestry::Ancestry;
pub use error::{Result, Thrown};
pub use instance::{default_stack, Builtin, ErrorClass, ErrorRef, Initializer};
pub use json_safe::{make_json_safe, Depth};
pub use normalize::normalize_exception;
pub use object::{Array, Function, NativeFn, Object, Properties, Property, PropertyKey, Slot, Symbol};
pub use safe::Absent;
pub use value::Value;
