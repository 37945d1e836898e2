//! Transformation engine for errwire
//!
//! This crate converts between live error instances and JSON-safe error
//! objects:
//! - serialize / parse: The two entry points
//! - Options, OptionsBuilder: Per-call configuration and validation
//! - Hook, Hooks: Lifecycle callbacks, invoked without ever propagating a throw
//! - args: `constructorArgs` packing
//! - registry: Name to error class resolution
//! - filter: Core/extra property selection and `include` / `exclude`
//! - SerializerConfig: Data-only settings from `errwire.toml`
//!
//! Neither entry point fails on input data. Malformed options are the only
//! caller-visible error, reported by [`Options::from_value`] or by the
//! `try_*` variants that validate raw options.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod config;
pub mod error;
pub mod filter;
pub mod hooks;
pub mod options;
pub mod parse;
pub mod registry;
pub mod serialize;

pub use config::{SerializerConfig, CONFIG_FILE_NAME};
pub use error::{ConfigError, OptionsError, Result};
pub use hooks::{Hook, Hooks};
pub use options::{validate_options, Options, OptionsBuilder};
pub use parse::is_error_object;
pub use registry::{resolve, ClassMap, Resolved, WELL_KNOWN};

use errwire_core::Value;

/// Convert error instances in `value` into JSON-safe error objects.
///
/// Unless `options.loose` is set, a non-error `value` is first normalized into
/// an error, so the result is always an error object.
pub fn serialize(value: &Value, options: &Options) -> Value {
    serialize::serialize_value(value, options)
}

/// Convert error objects in `value` back into error instances.
///
/// Unless `options.loose` is set, a value that is not an error object is
/// first coerced into one, so the result is always an error instance.
pub fn parse(value: &Value, options: &Options) -> Value {
    parse::parse_value(value, options)
}

/// [`serialize`] with a dynamic options mapping (`Undefined` for none)
pub fn try_serialize(value: &Value, options: &Value) -> Result<Value> {
    let options = Options::from_value(options)?;
    Ok(serialize(value, &options))
}

/// [`parse`] with a dynamic options mapping (`Undefined` for none)
pub fn try_parse(value: &Value, options: &Value) -> Result<Value> {
    let options = Options::from_value(options)?;
    Ok(parse(value, &options))
}
