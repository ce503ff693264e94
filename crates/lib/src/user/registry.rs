//! Directories registered by record type.

use std::collections::HashMap;

use super::{UserDirectory, UserRecord};
use crate::{
    Result,
    config::ConfigurationError,
    record::{Registered, Snapshot},
};

/// The directories live in the current runtime context, keyed by the
/// record type they produce.
///
/// Snapshots name their record type; the registry resolves it back to a
/// live directory, which rebinds storage and collaborators.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    directories: HashMap<String, UserDirectory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `directory` for account snapshots.
    pub fn with_users(mut self, directory: UserDirectory) -> Self {
        self.register(UserRecord::type_id(), directory);
        self
    }

    /// Registers `directory` under `type_id`, replacing any previous one.
    pub fn register(&mut self, type_id: impl Into<String>, directory: UserDirectory) {
        self.directories.insert(type_id.into(), directory);
    }

    pub fn get(&self, type_id: &str) -> Option<&UserDirectory> {
        self.directories.get(type_id)
    }

    /// Rebuilds a record from its snapshot through the registered
    /// directory.
    ///
    /// Fails with [`ConfigurationError::DirectoryNotFound`] when no
    /// directory is registered for the snapshot type.
    pub fn rehydrate(&self, snapshot: &Snapshot) -> Result<UserRecord> {
        let Some(directory) = self.directories.get(&snapshot.type_id) else {
            tracing::warn!(type_id = %snapshot.type_id, key = %snapshot.key, "Cannot rehydrate record");
            return Err(ConfigurationError::DirectoryNotFound {
                type_id: snapshot.type_id.clone(),
            }
            .into());
        };
        directory.rehydrate(snapshot)
    }
}
