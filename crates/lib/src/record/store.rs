//! The `RecordStore` trait abstracting where record elements live.

use std::any::Any;

use crate::{Result, data::Properties};

/// Storage abstraction for keyed element trees.
///
/// A store knows nothing about record types: it maps keys to [`Properties`]
/// documents. Directories build typed records on top of it.
///
/// All stores must be `Send` and `Sync` so a directory can be shared, and
/// implement `Any` to allow downcasting (for example to call
/// [`InMemory::save_to_file`](super::InMemory::save_to_file)).
///
/// Stores do not coordinate concurrent writers: the last write wins.
pub trait RecordStore: Send + Sync + Any {
    /// Retrieves the elements stored under `key`, if any.
    fn lookup(&self, key: &str) -> Result<Option<Properties>>;

    /// Replaces the elements stored under `key`.
    fn write(&self, key: &str, elements: &Properties) -> Result<()>;

    /// Removes `key`. Returns whether anything was removed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Returns all stored keys in sorted order.
    fn keys(&self) -> Result<Vec<String>>;

    /// Returns true if `key` has persisted content.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.lookup(key)?.is_some())
    }

    /// Finds the first key (in sorted order) whose text value at `field`
    /// equals `query`, ignoring case.
    ///
    /// The default implementation scans every record.
    fn search(&self, query: &str, field: &str) -> Result<Option<String>> {
        let needle = query.to_lowercase();
        for key in self.keys()? {
            let Some(elements) = self.lookup(&key)? else {
                continue;
            };
            if elements
                .get_text(field)
                .is_some_and(|value| value.to_lowercase() == needle)
            {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }

    /// Short human-readable description used in logs and snapshots.
    fn describe(&self) -> String;

    /// Returns a reference to the store as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}
