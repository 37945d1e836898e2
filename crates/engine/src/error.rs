//! Error types for the engine
//!
//! `serialize` and `parse` never fail on input data. The only caller-visible
//! failures are malformed options ([`OptionsError`]) and config file problems
//! ([`ConfigError`]).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for option validation
pub type Result<T> = std::result::Result<T, OptionsError>;

/// Malformed `serialize`/`parse` options
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// Options are not a plain object
    #[error("Options must be a plain object: {0}")]
    NotAnObject(String),

    /// A boolean option has another type
    #[error("Option \"{name}\" must be a boolean: {value}")]
    NotABoolean {
        /// Option name
        name: String,
        /// String conversion of the rejected value
        value: String,
    },

    /// A list option is not an array
    #[error("Option \"{name}\" must be an array: {value}")]
    NotAList {
        /// Option name
        name: String,
        /// String conversion of the rejected value
        value: String,
    },

    /// A list option contains something other than strings
    #[error("Option \"{name}\" must only contain strings: {value}")]
    NonStringItem {
        /// Option name
        name: String,
        /// String conversion of the first invalid item
        value: String,
    },

    /// A hook option is not a function
    #[error("Option \"{name}\" must be a function: {value}")]
    NotAFunction {
        /// Option name
        name: String,
        /// String conversion of the rejected value
        value: String,
    },

    /// The class registry is not a plain object
    #[error("Option \"{name}\" must be a plain object: {value}")]
    NotAClassMap {
        /// `classes` or `types`
        name: String,
        /// String conversion of the rejected value
        value: String,
    },

    /// A class registry entry is not callable
    #[error("Option \"{name}.{class}\" must be a function: {value}")]
    ClassNotCallable {
        /// `classes` or `types`
        name: String,
        /// Registry key
        class: String,
        /// String conversion of the rejected value
        value: String,
    },

    /// A class registry entry is callable but not an error class
    #[error("Option \"{name}.{class}\" must be an error class: {value}")]
    NotAnErrorClass {
        /// `classes` or `types`
        name: String,
        /// Registry key
        class: String,
        /// String conversion of the rejected value
        value: String,
    },

    /// Unrecognized option key
    #[error("Unknown option \"{0}\"")]
    Unknown(String),

    /// Two options that name the same setting were both given
    #[error("Options \"{0}\" and \"{1}\" cannot be used together")]
    Conflict(&'static str, &'static str),
}

/// Failure loading or writing an `errwire.toml` file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The file is not valid TOML for this config
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// The config could not be rendered as TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written
    #[error("Failed to write config file '{}': {source}", .path.display())]
    Write {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}
