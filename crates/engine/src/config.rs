//! Serializer configuration via `errwire.toml`
//!
//! Only data settings live in the file. Hooks and classes are code, so they
//! are added on [`OptionsBuilder`](crate::OptionsBuilder) after loading:
//!
//! ```no_run
//! # use errwire_engine::{Options, SerializerConfig};
//! # use std::path::Path;
//! let config = SerializerConfig::from_file(Path::new("errwire.toml"))?;
//! let options = Options::builder().config(&config).build();
//! # Ok::<(), errwire_engine::ConfigError>(())
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "errwire.toml";

/// Serializer configuration loaded from `errwire.toml`.
///
/// # Example
///
/// ```toml
/// shallow = false
/// loose = false
/// include = ["name", "message", "stack"]
/// # exclude = ["stack"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerializerConfig {
    /// Stop at the first error boundary.
    #[serde(default)]
    pub shallow: bool,
    /// Pass non-conforming input through untouched.
    #[serde(default)]
    pub loose: bool,
    /// Properties to keep (`message` is always kept).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    /// Properties to drop (`message` cannot be dropped).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

impl SerializerConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# errwire configuration
#
# Stop at the first error boundary instead of walking causes,
# aggregated errors and containers (default: false)
shallow = false

# Pass input that is not an error (or error object) through untouched
# instead of coercing it (default: false)
loose = false

# Properties to keep. "message" is always kept.
# include = ["name", "message", "stack"]

# Properties to drop. "message" cannot be dropped.
# exclude = ["stack"]
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, path)?;
        debug!(target: "errwire::config", path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            info!(target: "errwire::config", path = %path.display(), "Wrote default config");
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
