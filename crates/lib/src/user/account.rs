//! The account record.

use sha2::{Digest, Sha256};

use super::{
    UserDirectory,
    crypto::Verification,
    media::{AvatarMedia, MediaFile},
};
use crate::{
    Result,
    config::DEFAULT_HASH_KEY,
    data::{Properties, Value},
    record::{Record, Registered, Snapshot},
};

/// Element keys that only exist at runtime and are never stored.
pub const RUNTIME_FIELDS: [&str; 2] = ["authenticated", "authorized"];

/// Element keys holding plaintext passwords, stripped before storage.
pub const TRANSIENT_FIELDS: [&str; 3] = ["password", "password1", "password2"];

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar/";

/// A user account.
///
/// Wraps a [`Record`] keyed by the lower-cased username and adds the
/// runtime login state. `authenticated` and `authorized` are held outside
/// the elements: input elements carrying those keys have them removed, and
/// they are never written to storage.
///
/// Accounts are obtained from a [`UserDirectory`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    record: Record,
    directory: UserDirectory,
    authenticated: bool,
    authorized: bool,
}

impl Registered for UserRecord {
    fn type_id() -> &'static str {
        "user"
    }
}

impl UserRecord {
    pub(super) fn new(mut record: Record, directory: UserDirectory) -> Self {
        strip_runtime_fields(record.elements_mut());
        Self {
            record,
            directory,
            authenticated: false,
            authorized: false,
        }
    }

    /// The account key (lower-cased username).
    pub fn key(&self) -> &str {
        self.record.key()
    }

    pub fn username(&self) -> &str {
        self.record
            .elements()
            .get_text("username")
            .unwrap_or(self.record.key())
    }

    pub fn email(&self) -> Option<&str> {
        self.record.elements().get_text("email")
    }

    /// The account state; missing means `enabled`.
    pub fn state(&self) -> &str {
        self.record
            .elements()
            .get_text("state")
            .unwrap_or("enabled")
    }

    pub fn is_enabled(&self) -> bool {
        self.state() == "enabled"
    }

    /// Group names in stored order.
    pub fn groups(&self) -> Vec<&str> {
        self.record
            .elements()
            .get_key("groups")
            .map(Value::text_items)
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Result of the most recent [`UserRecord::authorize`] call.
    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Marks the account as authenticated by an outside mechanism, such as
    /// an external login provider.
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
        if !authenticated {
            self.authorized = false;
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    pub fn elements(&self) -> &Properties {
        self.record.elements()
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn exists(&self) -> bool {
        self.record.exists()
    }

    pub fn get_nested_property(&self, path: &str, default: impl Into<Value>) -> Value {
        self.record.get_nested_property(path, default)
    }

    pub fn set_nested_property(
        &mut self,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        self.record.set_nested_property(path, value)
    }

    pub fn unset_nested_property(&mut self, path: &str) -> Option<Value> {
        self.record.unset_nested_property(path)
    }

    pub fn def_nested_property(&mut self, path: &str, default: impl Into<Value>) -> Result<bool> {
        self.record.def_nested_property(path, default)
    }

    /// Merges `data` following the account blueprint. Runtime flags in
    /// `data` are ignored.
    pub fn merge(&mut self, data: &Properties) -> Result<()> {
        let mut data = data.clone();
        strip_runtime_fields(&mut data);
        self.record.merge(&data)
    }

    /// Validates the elements against the account blueprint.
    pub fn validate(&self) -> Result<()> {
        self.record.validate()
    }

    /// The elements as written to storage: no runtime flags and no
    /// plaintext passwords.
    pub fn prepare_storage(&self) -> Properties {
        let mut prepared = self.record.prepare_storage();
        strip_runtime_fields(&mut prepared);
        for field in TRANSIENT_FIELDS {
            prepared.remove(field);
        }
        prepared
    }

    /// Saves the account.
    ///
    /// A plaintext `password` element is hashed into `hashed_password`
    /// first, and all plaintext password fields are dropped.
    pub fn save(&mut self) -> Result<()> {
        let plaintext = self
            .record
            .elements()
            .get_key("password")
            .and_then(Value::as_text)
            .map(str::to_string);

        if let Some(plaintext) = plaintext {
            let hash = self.directory.hasher().create(&plaintext)?;
            let elements = self.record.elements_mut();
            for field in TRANSIENT_FIELDS {
                elements.remove(field);
            }
            elements.insert("hashed_password", hash);
        }

        let prepared = self.prepare_storage();
        self.record.persist(&prepared)?;
        tracing::debug!(username = %self.key(), "Saved account");
        Ok(())
    }

    /// Deletes the stored account. Returns `Ok(false)` if it was never
    /// stored.
    pub fn delete(&mut self) -> Result<bool> {
        self.record.delete()
    }

    /// Checks `password` against the account.
    ///
    /// The hasher always runs, also for accounts without a stored hash, so
    /// unknown accounts take as long as wrong passwords. Accounts still
    /// holding a legacy plaintext `password` are compared directly; on a
    /// match the password is hashed and the account saved before returning.
    /// The same happens when the stored hash uses outdated parameters.
    pub fn authenticate(&mut self, password: &str) -> Result<bool> {
        let hasher = self.directory.hasher().clone();
        let stored = self
            .record
            .elements()
            .get_text("hashed_password")
            .map(str::to_string);

        let mut result = match &stored {
            Some(hash) => hasher.verify(password, hash),
            None => {
                let hash = self
                    .directory
                    .config()
                    .get_text(DEFAULT_HASH_KEY)
                    .unwrap_or_else(|| hasher.dummy_hash());
                // Nothing can match without a stored hash, but the hasher
                // still has to run.
                let _ = hasher.verify(password, &hash);
                Verification::Fail
            }
        };

        let legacy = self
            .record
            .elements()
            .get_key("password")
            .and_then(Value::as_text)
            .map(str::to_string);
        if let Some(plaintext) = legacy {
            if plaintext != password {
                return Ok(false);
            }
            result = Verification::NeedsRehash;
        }

        if result == Verification::NeedsRehash {
            tracing::warn!(username = %self.key(), "Rotating outdated password storage");
            self.record.set_property("password", password);
            self.record.unset_property("hashed_password");
            self.save()?;
        }

        Ok(result.is_match())
    }

    /// Authenticates with `password` and, if the account is enabled, marks
    /// it as authenticated.
    pub fn login(&mut self, password: &str) -> Result<bool> {
        self.authorized = false;
        if !self.authenticate(password)? {
            self.authenticated = false;
            tracing::info!(username = %self.key(), "Login failed");
            return Ok(false);
        }
        if !self.is_enabled() {
            self.authenticated = false;
            tracing::info!(username = %self.key(), state = %self.state(), "Login refused for inactive account");
            return Ok(false);
        }
        self.authenticated = true;
        tracing::info!(username = %self.key(), "Logged in");
        Ok(true)
    }

    /// Clears the runtime login state.
    pub fn logout(&mut self) {
        self.authenticated = false;
        self.authorized = false;
    }

    /// Returns whether the account may perform `action` within `scope`.
    ///
    /// Always false unless the account is authenticated and enabled.
    /// Records the result as the runtime `authorized` flag.
    pub fn authorize(&mut self, action: &str, scope: Option<&str>) -> bool {
        self.authorized = self.authenticated
            && self.is_enabled()
            && self
                .directory
                .engine()
                .authorize(self.record.elements(), action, scope);
        self.authorized
    }

    /// The uploaded avatar, in original and thumbnail renditions.
    pub fn avatar_media(&self) -> Option<AvatarMedia> {
        let resolver = self.directory.media()?;
        let filename = self.avatar_filename()?;
        let original = resolver.resolve(&filename)?;
        Some(AvatarMedia {
            original,
            thumbnail: resolver.thumbnail(&filename),
        })
    }

    /// URL of the account avatar.
    ///
    /// Uses the uploaded avatar if it resolves, then an avatar URL supplied
    /// by the external login provider, and finally a Gravatar URL derived
    /// from the e-mail address. Empty when none of these is available.
    pub fn avatar_url(&self) -> String {
        if let Some(media) = self.avatar_media() {
            return media.original.url().to_string();
        }
        if let Some(url) = self.provider_avatar_url() {
            return url.to_string();
        }
        match self.email().filter(|email| !email.trim().is_empty()) {
            Some(email) => gravatar_url(email),
            None => String::new(),
        }
    }

    /// The first uploaded avatar entry's file name.
    ///
    /// Entries are keyed by upload path and may carry a `name`.
    fn avatar_filename(&self) -> Option<String> {
        let avatar = self.record.elements().get_key("avatar")?.as_map()?;
        let (key, info) = avatar.iter().next()?;
        let name = info
            .as_map()
            .and_then(|info| info.get_text("name"))
            .unwrap_or_else(|| key.rsplit('/').next().unwrap_or(key.as_str()));
        Some(name.to_string())
    }

    /// `provider` is either the provider's data or the name of the element
    /// holding it.
    fn provider_avatar_url(&self) -> Option<&str> {
        let elements = self.record.elements();
        let provider = match elements.get_key("provider")? {
            Value::Map(map) => map,
            Value::Text(name) => elements.get_key(name)?.as_map()?,
            _ => return None,
        };
        ["avatar_url", "avatar"]
            .into_iter()
            .find_map(|field| provider.get_text(field).filter(|url| !url.is_empty()))
    }

    /// Captures the account for later [`UserDirectory::rehydrate`].
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = self.record.snapshot(Self::type_id());
        strip_runtime_fields(&mut snapshot.elements);
        snapshot
    }

    /// Resolves a named media file through the directory's resolver.
    pub fn media_file(&self, filename: &str) -> Option<MediaFile> {
        self.directory.media()?.resolve(filename)
    }
}

pub(super) fn strip_runtime_fields(elements: &mut Properties) {
    for field in RUNTIME_FIELDS {
        elements.remove(field);
    }
}

/// Gravatar URL for an e-mail address (SHA-256 of the trimmed, lower-cased
/// address).
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!("{GRAVATAR_BASE}{}", hex::encode(digest))
}
