//! The account directory: loading, finding, creating and removing accounts.

use std::{fmt, sync::Arc};

use super::{
    UserRecord,
    account::strip_runtime_fields,
    crypto::{Argon2Hasher, PasswordHasher},
    errors::UserError,
    media::MediaResolver,
};
use crate::{
    Result,
    auth::AuthorizationEngine,
    blueprint::Blueprint,
    config::{self, ConfigStore},
    data::Properties,
    record::{Record, RecordStore, Registered, Snapshot},
};

/// Fields searched by [`UserDirectory::find`] when none are given.
pub const DEFAULT_FIND_FIELDS: [&str; 2] = ["username", "email"];

/// Locates and creates [`UserRecord`]s on top of a [`RecordStore`].
///
/// The directory carries every collaborator an account needs (store,
/// configuration, password hasher, media resolver, blueprint) and hands
/// them to the accounts it produces. Cloning is cheap.
///
/// Usernames are case-insensitive: keys are lower-cased before every
/// lookup.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn RecordStore>,
    config: Arc<dyn ConfigStore>,
    hasher: Arc<dyn PasswordHasher>,
    media: Option<Arc<dyn MediaResolver>>,
    blueprint: Arc<Blueprint>,
    engine: AuthorizationEngine,
}

impl fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDirectory")
            .field("store", &self.store.describe())
            .field("blueprint", &self.blueprint.name())
            .field("media", &self.media.is_some())
            .finish_non_exhaustive()
    }
}

impl UserDirectory {
    /// Creates a directory with the default Argon2 hasher, the built-in
    /// account blueprint and no media resolver.
    pub fn new(store: Arc<dyn RecordStore>, config: Arc<dyn ConfigStore>) -> Self {
        Self {
            engine: AuthorizationEngine::new(config.clone()),
            store,
            config,
            hasher: Arc::new(Argon2Hasher::default()),
            media: None,
            blueprint: Arc::new(Blueprint::user()),
        }
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_media(mut self, media: Arc<dyn MediaResolver>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_blueprint(mut self, blueprint: Arc<Blueprint>) -> Self {
        self.blueprint = blueprint;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn config(&self) -> &Arc<dyn ConfigStore> {
        &self.config
    }

    pub fn hasher(&self) -> &Arc<dyn PasswordHasher> {
        &self.hasher
    }

    pub fn media(&self) -> Option<&Arc<dyn MediaResolver>> {
        self.media.as_ref()
    }

    pub fn blueprint(&self) -> &Arc<Blueprint> {
        &self.blueprint
    }

    pub fn engine(&self) -> &AuthorizationEngine {
        &self.engine
    }

    /// Wraps `record` as an account bound to this directory.
    fn account(&self, record: Record) -> UserRecord {
        UserRecord::new(
            record
                .with_storage(self.store.clone())
                .with_blueprint(self.blueprint.clone()),
            self.clone(),
        )
    }

    /// Loads an account by username.
    ///
    /// Never fails for a missing account: a fresh, enabled account with the
    /// requested key is returned and [`UserRecord::exists`] reports `false`.
    pub fn load(&self, username: &str) -> Result<UserRecord> {
        let key = normalize_username(username);
        let mut record = Record::load(self.store.clone(), key.clone(), Properties::new())?;

        let elements = record.elements_mut();
        elements.def("username", key.as_str())?;
        elements.def("state", "enabled")?;

        Ok(self.account(record))
    }

    /// Finds an account by trying `fields` in order.
    ///
    /// `username` is matched against account keys; other fields are
    /// compared case-insensitively against stored values. Falls back to the
    /// empty placeholder account, `load("")`, when nothing matches.
    pub fn find(&self, query: &str, fields: &[&str]) -> Result<UserRecord> {
        let fields = if fields.is_empty() {
            &DEFAULT_FIND_FIELDS[..]
        } else {
            fields
        };

        for field in fields {
            let found = if *field == "username" {
                let key = normalize_username(query);
                self.store.contains(&key)?.then_some(key)
            } else {
                self.store.search(query, field)?
            };
            if let Some(key) = found {
                tracing::debug!(field, key = %key, "Found account");
                return self.load(&key);
            }
        }

        self.load("")
    }

    /// Removes an account. Returns whether it existed.
    pub fn remove(&self, username: &str) -> Result<bool> {
        let mut user = self.load(username)?;
        if !user.exists() {
            return Ok(false);
        }
        user.delete()?;
        tracing::info!(username = %user.key(), "Removed account");
        Ok(true)
    }

    /// Creates and saves a new account.
    ///
    /// The username must match the configured `system.username_regex`.
    /// `data` is merged over the blueprint defaults and validated; a
    /// plaintext `password` in `data` is hashed on save.
    pub fn create(&self, username: &str, data: &Properties) -> Result<UserRecord> {
        let key = normalize_username(username);
        let pattern = config::username_regex(self.config.as_ref())?;
        if !pattern.is_match(&key) {
            return Err(UserError::InvalidUsername {
                username: key,
                pattern: pattern.as_str().to_string(),
            }
            .into());
        }
        if self.store.contains(&key)? {
            return Err(UserError::AlreadyExists { username: key }.into());
        }

        let mut data = data.clone();
        strip_runtime_fields(&mut data);
        data.insert("username", key.as_str());

        let elements =
            self.blueprint
                .merge_data(&self.blueprint.get_defaults(), &data, None, '.')?;
        self.blueprint.validate(&elements)?;

        let mut user = self.account(Record::new(key, elements));
        user.save()?;
        tracing::info!(username = %user.key(), "Created account");
        Ok(user)
    }

    /// Returns every stored username in sorted order.
    pub fn list(&self) -> Result<Vec<String>> {
        self.store.keys()
    }

    /// Rebuilds an account from a snapshot.
    ///
    /// Storage is rebound to this directory's store from the snapshot key;
    /// any stored storage descriptor is ignored. Elements are restored as
    /// captured, minus runtime flags.
    pub fn rehydrate(&self, snapshot: &Snapshot) -> Result<UserRecord> {
        if snapshot.type_id != UserRecord::type_id() {
            return Err(config::ConfigurationError::DirectoryNotFound {
                type_id: snapshot.type_id.clone(),
            }
            .into());
        }
        let key = normalize_username(&snapshot.key);
        let mut record = Record::load(self.store.clone(), key, Properties::new())?;
        *record.elements_mut() = snapshot.elements.clone();
        Ok(self.account(record))
    }
}

/// Lower-cases and trims a username into an account key.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}
