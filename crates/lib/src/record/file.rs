//! Directory-backed record store.
//!
//! Each record lives in its own `<key>.json` document inside one directory.
//! Writes go to a hidden temporary file first and are moved into place with
//! a rename, so readers never observe a half-written record.

use std::{
    any::Any,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use super::{RecordStore, errors::StorageError};
use crate::{Result, data::Properties};

const EXTENSION: &str = "json";

/// The current on-disk document version.
const DOCUMENT_VERSION: u8 = 0;

fn is_v0(v: &u8) -> bool {
    *v == 0
}

#[derive(Serialize, Deserialize)]
struct Document {
    #[serde(rename = "_v", default, skip_serializing_if = "is_v0")]
    version: u8,
    #[serde(default)]
    elements: Properties,
}

/// A record store keeping one JSON document per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StorageError::FileIo {
            path: root.clone(),
            source,
        })?;
        tracing::debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    /// The directory holding the record documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }

    fn read_document(&self, key: &str, path: &Path) -> Result<Option<Properties>> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::FileIo {
                    path: path.to_path_buf(),
                    source,
                }
                .into());
            }
        };
        let document: Document =
            serde_json::from_str(&json).map_err(|source| StorageError::Serialization {
                key: key.to_string(),
                source,
            })?;
        if document.version != DOCUMENT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: document.version,
                supported: DOCUMENT_VERSION,
            }
            .into());
        }
        Ok(Some(document.elements))
    }
}

/// Checks that `key` can be used as a file name on its own.
fn validate_key(key: &str) -> std::result::Result<(), StorageError> {
    let reason = if key.is_empty() {
        Some("key is empty")
    } else if key.starts_with('.') {
        Some("key starts with '.'")
    } else if key.len() > 200 {
        Some("key is longer than 200 bytes")
    } else if key
        .chars()
        .any(|c| c == '/' || c == '\\' || c == ':' || c.is_control())
    {
        Some("key contains a path separator or control character")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

impl RecordStore for FileStore {
    fn lookup(&self, key: &str) -> Result<Option<Properties>> {
        // Nothing can have been written under a key that fails validation.
        if validate_key(key).is_err() {
            return Ok(None);
        }
        self.read_document(key, &self.path_for(key))
    }

    fn write(&self, key: &str, elements: &Properties) -> Result<()> {
        validate_key(key)?;

        let document = Document {
            version: DOCUMENT_VERSION,
            elements: elements.clone(),
        };
        let json =
            serde_json::to_string_pretty(&document).map_err(|source| StorageError::Serialization {
                key: key.to_string(),
                source,
            })?;

        let target = self.path_for(key);
        let temp = self.root.join(format!(".{key}.{EXTENSION}.tmp"));
        fs::write(&temp, json).map_err(|source| StorageError::FileIo {
            path: temp.clone(),
            source,
        })?;
        fs::rename(&temp, &target).map_err(|source| StorageError::FileIo {
            path: target.clone(),
            source,
        })?;

        tracing::debug!(key, path = %target.display(), "Wrote record");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        if validate_key(key).is_err() {
            return Ok(false);
        }
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(key, "Removed record");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::FileIo { path, source }.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| StorageError::FileIo {
            path: self.root.clone(),
            source,
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StorageError::FileIo {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_key(stem).is_ok()
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(validate_key(key).is_ok() && self.path_for(key).is_file())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.root.display())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
