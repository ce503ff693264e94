//! Minimal serialized form of a record.
//!
//! A snapshot carries no live handles: only the record type, its key, its
//! elements and a description of where it was stored. Rebuilding a usable
//! record from it goes through a directory, which binds fresh storage.

use serde::{Deserialize, Serialize};

use crate::{Result, data::Properties};

/// Where a record was stored when its snapshot was taken.
///
/// Informational only. Rehydration always rebinds storage from the record
/// key and ignores this descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDescriptor {
    /// [`RecordStore::describe`](super::RecordStore::describe) of the store
    pub store: String,
    /// Key the record was stored under
    pub key: String,
}

/// Serialized `{type, key, elements, storage}` form of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Registered type of the record, used to find its directory
    #[serde(rename = "type")]
    pub type_id: String,
    pub key: String,
    #[serde(default)]
    pub elements: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageDescriptor>,
}

impl Snapshot {
    /// Serializes the snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
