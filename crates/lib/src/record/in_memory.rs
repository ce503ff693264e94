//! In-memory record store.
//!
//! Suitable for testing, development, or deployments where persistence is
//! handled by dumping the whole store to a JSON file with
//! [`InMemory::save_to_file`] and reading it back with
//! [`InMemory::load_from_file`].

use std::{any::Any, collections::BTreeMap, path::Path};

use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};

use super::{RecordStore, errors::StorageError};
use crate::{Result, data::Properties};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// Serializable form of the whole store
#[derive(Serialize, Deserialize)]
struct SerializableStore {
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    #[serde(default)]
    records: BTreeMap<String, Properties>,
}

/// A record store backed by a map guarded by a read-write lock.
#[derive(Debug, Default)]
pub struct InMemory {
    records: RwLock<BTreeMap<String, Properties>>,
}

impl InMemory {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Saves every record to `path` as a single JSON document.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let serializable = SerializableStore {
            version: PERSISTENCE_VERSION,
            records: self.records.read().clone(),
        };
        let json = serde_json::to_string_pretty(&serializable).map_err(|source| {
            StorageError::Serialization {
                key: path.display().to_string(),
                source,
            }
        })?;
        std::fs::write(path, json).map_err(|source| StorageError::FileIo {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), records = serializable.records.len(), "Saved in-memory store");
        Ok(())
    }

    /// Loads a store previously written by [`InMemory::save_to_file`].
    ///
    /// If the file does not exist, a new, empty store is returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(StorageError::FileIo {
                    path: path.to_path_buf(),
                    source,
                }
                .into());
            }
        };
        let serializable: SerializableStore =
            serde_json::from_str(&json).map_err(|source| StorageError::Serialization {
                key: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            records: RwLock::new(serializable.records),
        })
    }
}

impl RecordStore for InMemory {
    fn lookup(&self, key: &str) -> Result<Option<Properties>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn write(&self, key: &str, elements: &Properties) -> Result<()> {
        self.records
            .write()
            .insert(key.to_string(), elements.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.records.write().remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.records.read().keys().cloned().collect())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.records.read().contains_key(key))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
