//! Runtime configuration.
//!
//! Configuration is a nested [`Properties`] tree read through dot paths.
//! Components that need settings receive a [`ConfigStore`] at construction
//! time instead of reaching for global state.
//!
//! Keys read by this crate:
//!
//! | Path | Meaning |
//! |------|---------|
//! | `groups.<group>.access.<action>` | Permission granted to members of `<group>` |
//! | `system.security.default_hash` | Hash verified when an account has none stored |
//! | `system.username_regex` | Pattern new usernames must match |
//! | `system.media.base_url` | Base URL for uploaded account media |

use std::path::{Path, PathBuf};

use regex::Regex;
use url::Url;

use crate::{
    Result,
    data::{Properties, Value},
};

pub mod errors;

pub use errors::ConfigurationError;

/// Path of the hash verified when an account has no stored hash.
pub const DEFAULT_HASH_KEY: &str = "system.security.default_hash";
/// Path of the pattern new usernames must match.
pub const USERNAME_REGEX_KEY: &str = "system.username_regex";
/// Path of the base URL for uploaded media.
pub const MEDIA_BASE_URL_KEY: &str = "system.media.base_url";

/// Username pattern used when none is configured.
pub const DEFAULT_USERNAME_REGEX: &str = "^[a-z0-9_-]{3,16}$";

/// Read access to configuration values by dot path.
pub trait ConfigStore: Send + Sync {
    /// Returns the value at `path`, if set.
    fn get(&self, path: &str) -> Option<Value>;

    /// Returns the text value at `path`, if set and textual.
    fn get_text(&self, path: &str) -> Option<String> {
        self.get(path)
            .and_then(|value| value.as_text().map(str::to_string))
    }
}

impl ConfigStore for Properties {
    fn get(&self, path: &str) -> Option<Value> {
        Properties::get(self, path).cloned()
    }
}

/// Configuration loaded from a JSON document.
#[derive(Debug, Clone, Default)]
pub struct Config {
    source: Option<PathBuf>,
    values: Properties,
}

impl Config {
    /// Wraps an in-memory tree.
    pub fn new(values: Properties) -> Self {
        Self {
            source: None,
            values,
        }
    }

    /// Parses configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(Properties::from_json(json)?))
    }

    /// Loads configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| {
            ConfigurationError::Unreadable {
                path: path.display().to_string(),
                source,
            }
        })?;
        let values: Properties =
            serde_json::from_str(&json).map_err(|e| ConfigurationError::InvalidConfig {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(Self {
            source: Some(path.to_path_buf()),
            values,
        })
    }

    /// The file this configuration was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn values(&self) -> &Properties {
        &self.values
    }

    /// Sets a value, mostly useful for tests and CLI overrides.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.values.set(path, value)?;
        Ok(())
    }

    /// The compiled username pattern, falling back to
    /// [`DEFAULT_USERNAME_REGEX`].
    pub fn username_regex(&self) -> Result<Regex> {
        username_regex(self)
    }

    /// The configured media base URL, if any.
    pub fn media_base_url(&self) -> Result<Option<Url>> {
        let Some(raw) = self.get_text(MEDIA_BASE_URL_KEY) else {
            return Ok(None);
        };
        let url = Url::parse(&raw).map_err(|e| ConfigurationError::InvalidConfig {
            path: MEDIA_BASE_URL_KEY.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(url))
    }
}

impl ConfigStore for Config {
    fn get(&self, path: &str) -> Option<Value> {
        self.values.get(path).cloned()
    }
}

/// Compiles the configured username pattern of any store.
pub fn username_regex(config: &dyn ConfigStore) -> Result<Regex> {
    let pattern = config
        .get_text(USERNAME_REGEX_KEY)
        .unwrap_or_else(|| DEFAULT_USERNAME_REGEX.to_string());
    let regex = Regex::new(&pattern).map_err(|e| ConfigurationError::InvalidConfig {
        path: USERNAME_REGEX_KEY.to_string(),
        reason: e.to_string(),
    })?;
    Ok(regex)
}
