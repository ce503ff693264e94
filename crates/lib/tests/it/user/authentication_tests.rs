//! Authentication tests: hashed, legacy plaintext and outdated passwords

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tessera::{
    Result,
    data::Properties,
    record::{InMemory, RecordStore},
    user::{Argon2Hasher, PasswordHasher, UserDirectory, Verification},
};

use crate::helpers::*;

/// Stores `elements` directly, bypassing account creation.
fn seed(directory: &UserDirectory, username: &str, elements: Properties) {
    directory.store().write(username, &elements).unwrap();
}

/// Argon2 hasher that counts `verify` calls.
struct CountingHasher {
    inner: Argon2Hasher,
    verifications: AtomicUsize,
}

impl CountingHasher {
    fn new() -> Self {
        Self {
            inner: Argon2Hasher::with_cost(8, 1, 1).unwrap(),
            verifications: AtomicUsize::new(0),
        }
    }

    fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for CountingHasher {
    fn verify(&self, plaintext: &str, hash: &str) -> Verification {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(plaintext, hash)
    }

    fn create(&self, plaintext: &str) -> Result<String> {
        self.inner.create(plaintext)
    }

    fn dummy_hash(&self) -> String {
        self.inner.dummy_hash()
    }
}

#[test]
fn test_every_authentication_runs_the_hasher() {
    let hasher = Arc::new(CountingHasher::new());
    let directory = UserDirectory::new(Arc::new(InMemory::new()), Arc::new(Properties::new()))
        .with_hasher(hasher.clone());

    // Unknown account
    let mut ghost = directory.load("ghost").unwrap();
    assert!(!ghost.authenticate("anything").unwrap());
    assert_eq!(hasher.verifications(), 1);

    // Stored account without any hash
    seed(&directory, "ada", props(r#"{"username": "ada", "email": "ada@example.org"}"#));
    let mut ada = directory.load("ada").unwrap();
    assert!(!ada.authenticate("anything").unwrap());
    assert_eq!(hasher.verifications(), 2);

    // Legacy plaintext that does not match
    seed(
        &directory,
        "grace",
        props(r#"{"username": "grace", "email": "grace@example.org", "password": "secret"}"#),
    );
    let mut grace = directory.load("grace").unwrap();
    assert!(!grace.authenticate("wrong").unwrap());
    assert_eq!(hasher.verifications(), 3);

    // Legacy plaintext that matches
    assert!(grace.authenticate("secret").unwrap());
    assert_eq!(hasher.verifications(), 4);

    // Regular hash
    assert!(grace.authenticate("secret").unwrap());
    assert!(!grace.authenticate("wrong").unwrap());
    assert_eq!(hasher.verifications(), 6);
}

#[test]
fn test_correct_password_keeps_hash() {
    let directory = directory();
    create_user(&directory, "ada", &[]);

    let mut ada = directory.load("ada").unwrap();
    let hash = ada.elements().get_text("hashed_password").unwrap().to_string();
    assert!(ada.authenticate(PASSWORD).unwrap());
    assert_eq!(ada.elements().get_text("hashed_password"), Some(hash.as_str()));

    let stored = directory.store().lookup("ada").unwrap().unwrap();
    assert_eq!(stored.get_text("hashed_password"), Some(hash.as_str()));
}

#[test]
fn test_wrong_password_fails() {
    let directory = directory();
    create_user(&directory, "ada", &[]);
    let mut ada = directory.load("ada").unwrap();
    assert!(!ada.authenticate("wrong").unwrap());
    assert!(!ada.login("wrong").unwrap());
    assert!(!ada.is_authenticated());
}

#[test]
fn test_legacy_plaintext_is_rotated() {
    let directory = directory();
    seed(
        &directory,
        "ada",
        props(r#"{"username": "ada", "email": "ada@example.org", "password": "secret"}"#),
    );

    let mut ada = directory.load("ada").unwrap();
    assert!(ada.authenticate("secret").unwrap());
    assert!(!ada.elements().contains("password"));
    let hash = ada.elements().get_text("hashed_password").unwrap().to_string();

    let stored = directory.store().lookup("ada").unwrap().unwrap();
    assert!(!stored.contains("password"));
    assert_eq!(stored.get_text("hashed_password"), Some(hash.as_str()));
    assert_eq!(
        directory.hasher().verify("secret", &hash),
        Verification::Ok
    );
}

#[test]
fn test_legacy_plaintext_mismatch_fails_without_saving() {
    let directory = directory();
    seed(
        &directory,
        "ada",
        props(r#"{"username": "ada", "email": "ada@example.org", "password": "secret"}"#),
    );

    let mut ada = directory.load("ada").unwrap();
    assert!(!ada.authenticate("Secret").unwrap());
    assert_eq!(ada.elements().get_text("password"), Some("secret"));
    assert_eq!(
        directory.store().lookup("ada").unwrap().unwrap().get_text("password"),
        Some("secret")
    );
}

#[test]
fn test_legacy_plaintext_wins_over_stale_hash() {
    let directory = directory();
    let stale = directory.hasher().create("old password").unwrap();
    let mut elements = props(r#"{"username": "ada", "email": "ada@example.org", "password": "secret"}"#);
    elements.insert("hashed_password", stale.as_str());
    seed(&directory, "ada", elements);

    let mut ada = directory.load("ada").unwrap();
    assert!(!ada.authenticate("old password").unwrap());
    assert!(ada.authenticate("secret").unwrap());
    assert_ne!(ada.elements().get_text("hashed_password"), Some(stale.as_str()));
}

#[test]
fn test_account_without_hash_never_authenticates() {
    let directory = directory();
    seed(&directory, "ada", props(r#"{"username": "ada", "email": "ada@example.org"}"#));

    let mut ada = directory.load("ada").unwrap();
    assert!(!ada.authenticate("").unwrap());
    assert!(!ada.authenticate("anything").unwrap());

    let mut ghost = directory.load("ghost").unwrap();
    assert!(!ghost.login("anything").unwrap());
}

#[test]
fn test_configured_default_hash_is_never_accepted() {
    let hasher = cheap_hasher();
    let default_hash = hasher.create("known").unwrap();
    let mut config = admin_config();
    config
        .set("system.security.default_hash", default_hash.as_str())
        .unwrap();
    let directory = UserDirectory::new(Arc::new(InMemory::new()), Arc::new(config))
        .with_hasher(hasher);

    let mut ghost = directory.load("ghost").unwrap();
    assert!(!ghost.authenticate("known").unwrap());
}

#[test]
fn test_outdated_hash_parameters_are_rotated() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemory::new());
    let old = UserDirectory::new(store.clone(), Arc::new(Properties::new())).with_hasher(cheap_hasher());
    create_user(&old, "ada", &[]);
    let old_hash = store.lookup("ada").unwrap().unwrap().get_text("hashed_password").unwrap().to_string();

    let stronger = Arc::new(Argon2Hasher::with_cost(16, 2, 1).unwrap());
    let new = UserDirectory::new(store.clone(), Arc::new(Properties::new())).with_hasher(stronger.clone());
    let mut ada = new.load("ada").unwrap();
    assert!(ada.authenticate(PASSWORD).unwrap());

    let new_hash = store.lookup("ada").unwrap().unwrap().get_text("hashed_password").unwrap().to_string();
    assert_ne!(new_hash, old_hash);
    assert_eq!(
        stronger.verify(PASSWORD, &new_hash),
        Verification::Ok
    );
}

#[test]
fn test_login_refuses_disabled_accounts() {
    let directory = directory();
    let mut ada = create_user(&directory, "ada", &["admin"]);
    ada.set_nested_property("state", "disabled").unwrap();
    ada.save().unwrap();

    let mut ada = directory.load("ada").unwrap();
    assert!(ada.authenticate(PASSWORD).unwrap());
    assert!(!ada.login(PASSWORD).unwrap());
    assert!(!ada.is_authenticated());
    assert!(!ada.authorize("edit", Some("site")));
}

#[test]
fn test_save_hashes_new_password() {
    let directory = directory();
    let mut ada = create_user(&directory, "ada", &[]);
    ada.set_nested_property("password", "a brand new secret").unwrap();
    ada.set_nested_property("password2", "a brand new secret").unwrap();
    ada.save().unwrap();
    assert!(!ada.elements().contains("password"));
    assert!(!ada.elements().contains("password2"));

    let mut ada = directory.load("ada").unwrap();
    assert!(!ada.authenticate(PASSWORD).unwrap());
    assert!(ada.authenticate("a brand new secret").unwrap());
}
