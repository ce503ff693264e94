//! Keyed, persistable element trees.
//!
//! A [`Record`] wraps a [`Properties`] tree together with its key, an
//! optional shared handle to the [`RecordStore`] it persists to, and an
//! optional [`Blueprint`] describing its schema. Typed records (such as
//! [`UserRecord`](crate::user::UserRecord)) hold a `Record` rather than
//! extending it.

use std::{fmt, sync::Arc};

use crate::{
    Result,
    blueprint::Blueprint,
    data::{Properties, Value},
    encoding::Encoder,
};

pub mod errors;
pub mod file;
pub mod in_memory;
pub mod registered;
pub mod snapshot;
pub mod store;

pub use errors::StorageError;
pub use file::FileStore;
pub use in_memory::InMemory;
pub use registered::Registered;
pub use snapshot::{Snapshot, StorageDescriptor};
pub use store::RecordStore;

/// A keyed element tree that can be saved to and deleted from a store.
#[derive(Clone)]
pub struct Record {
    key: String,
    elements: Properties,
    storage: Option<Arc<dyn RecordStore>>,
    blueprint: Option<Arc<Blueprint>>,
    exists: bool,
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("key", &self.key)
            .field("elements", &self.elements)
            .field("storage", &self.storage.as_ref().map(|s| s.describe()))
            .field("blueprint", &self.blueprint.as_ref().map(|b| b.name()))
            .field("exists", &self.exists)
            .finish()
    }
}

impl Record {
    /// Creates an unbound record that has never been persisted.
    pub fn new(key: impl Into<String>, elements: Properties) -> Self {
        Self {
            key: key.into(),
            elements,
            storage: None,
            blueprint: None,
            exists: false,
        }
    }

    /// Binds the record to a store.
    pub fn with_storage(mut self, storage: Arc<dyn RecordStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Attaches a blueprint used by [`Record::merge`], [`Record::validate`],
    /// [`Record::filter`] and [`Record::extra`].
    pub fn with_blueprint(mut self, blueprint: Arc<Blueprint>) -> Self {
        self.blueprint = Some(blueprint);
        self
    }

    /// Loads `key` from `storage`.
    ///
    /// Returns an unpersisted record with `fallback` elements when the store
    /// has nothing under `key`.
    pub fn load(
        storage: Arc<dyn RecordStore>,
        key: impl Into<String>,
        fallback: Properties,
    ) -> Result<Self> {
        let key = key.into();
        let found = storage.lookup(&key)?;
        let exists = found.is_some();
        Ok(Self {
            elements: found.unwrap_or(fallback),
            key,
            storage: Some(storage),
            blueprint: None,
            exists,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn elements(&self) -> &Properties {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut Properties {
        &mut self.elements
    }

    pub fn storage(&self) -> Option<&Arc<dyn RecordStore>> {
        self.storage.as_ref()
    }

    pub fn blueprint(&self) -> Option<&Arc<Blueprint>> {
        self.blueprint.as_ref()
    }

    /// True iff the record is bound to a store that holds its content.
    pub fn exists(&self) -> bool {
        self.exists && self.storage.is_some()
    }

    // Direct accessors: the name is a single key, dots included.

    /// Returns the top-level value `name`, or `default` when absent.
    pub fn get_property(&self, name: &str, default: impl Into<Value>) -> Value {
        match self.elements.get_key(name) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Sets the top-level value `name`, returning the previous value.
    pub fn set_property(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.elements.insert(name, value)
    }

    /// Removes the top-level value `name`.
    pub fn unset_property(&mut self, name: &str) -> Option<Value> {
        self.elements.remove(name)
    }

    // Nested accessors over dot paths.

    pub fn get_nested_property(&self, path: &str, default: impl Into<Value>) -> Value {
        self.elements.get_or(path, default)
    }

    pub fn set_nested_property(
        &mut self,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        Ok(self.elements.set(path, value)?)
    }

    pub fn unset_nested_property(&mut self, path: &str) -> Option<Value> {
        self.elements.unset(path)
    }

    pub fn def_nested_property(&mut self, path: &str, default: impl Into<Value>) -> Result<bool> {
        Ok(self.elements.def(path, default)?)
    }

    /// The elements as they should be written to storage.
    ///
    /// Plain records store everything.
    pub fn prepare_storage(&self) -> Properties {
        self.elements.clone()
    }

    /// Persists the record through its bound store.
    pub fn save(&mut self) -> Result<()> {
        let prepared = self.prepare_storage();
        self.persist(&prepared)
    }

    /// Writes `prepared` under the record key and marks the record as
    /// existing.
    ///
    /// Typed records call this after their own storage preparation.
    pub fn persist(&mut self, prepared: &Properties) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Err(StorageError::Unbound {
                key: self.key.clone(),
            }
            .into());
        };
        storage.write(&self.key, prepared)?;
        self.exists = true;
        Ok(())
    }

    /// Removes the persisted record.
    ///
    /// Returns `Ok(false)` without touching storage when the record was
    /// never persisted.
    pub fn delete(&mut self) -> Result<bool> {
        if !self.exists() {
            return Ok(false);
        }
        let Some(storage) = &self.storage else {
            return Ok(false);
        };
        let removed = storage.remove(&self.key)?;
        self.exists = false;
        Ok(removed)
    }

    /// Re-reads the elements from storage, discarding local changes.
    ///
    /// Returns whether the store had content for the key.
    pub fn reload(&mut self) -> Result<bool> {
        let Some(storage) = &self.storage else {
            return Err(StorageError::Unbound {
                key: self.key.clone(),
            }
            .into());
        };
        match storage.lookup(&self.key)? {
            Some(elements) => {
                self.elements = elements;
                self.exists = true;
            }
            None => self.exists = false,
        }
        Ok(self.exists)
    }

    /// Merges `data` into the elements.
    ///
    /// With a blueprint, field merge strategies apply; without one the trees
    /// are deep-unioned. On error the elements are left unchanged.
    pub fn merge(&mut self, data: &Properties) -> Result<()> {
        let merged = match &self.blueprint {
            Some(blueprint) => blueprint.merge_data(&self.elements, data, None, '.')?,
            None => self.elements.merge(data),
        };
        self.elements = merged;
        Ok(())
    }

    /// Validates the elements against the blueprint, if any.
    pub fn validate(&self) -> Result<()> {
        if let Some(blueprint) = &self.blueprint {
            blueprint.validate(&self.elements)?;
        }
        Ok(())
    }

    /// The elements restricted to declared fields.
    ///
    /// Without a blueprint nothing is filtered out.
    pub fn filter(&self) -> Properties {
        match &self.blueprint {
            Some(blueprint) => blueprint.filter(&self.elements),
            None => self.elements.clone(),
        }
    }

    /// The elements no blueprint field declares.
    pub fn extra(&self) -> Properties {
        match &self.blueprint {
            Some(blueprint) => blueprint.extra(&self.elements),
            None => Properties::new(),
        }
    }

    /// Captures the record as a [`Snapshot`] of the given type.
    pub fn snapshot(&self, type_id: &str) -> Snapshot {
        Snapshot {
            type_id: type_id.to_string(),
            key: self.key.clone(),
            elements: self.elements.clone(),
            storage: self.storage.as_ref().map(|s| StorageDescriptor {
                store: s.describe(),
                key: self.key.clone(),
            }),
        }
    }

    /// Encodes the storable elements as text.
    pub fn encode(&self, encoder: &dyn Encoder) -> Result<String> {
        encoder.encode(&self.prepare_storage())
    }
}
