//! Shared setup for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tessera::{
    data::Properties,
    record::{InMemory, RecordStore},
    user::{Argon2Hasher, UserDirectory, UserRecord},
};

pub const PASSWORD: &str = "correct horse battery";

/// Parses a JSON object into a tree.
pub fn props(json: &str) -> Properties {
    Properties::from_json(json).expect("Failed to parse test JSON")
}

/// A hasher cheap enough for tests.
pub fn cheap_hasher() -> Arc<Argon2Hasher> {
    Arc::new(Argon2Hasher::with_cost(8, 1, 1).expect("Failed to build hasher"))
}

/// Configuration granting `admin` everything under `site` and `admin`.
pub fn admin_config() -> Properties {
    props(
        r#"{
            "groups": {
                "admin": {"access": {"site": {"edit": true, "login": true}, "admin": {"login": true}}},
                "editors": {"access": {"site": {"edit": "yes"}}}
            }
        }"#,
    )
}

/// A directory over a fresh in-memory store.
pub fn directory_with(config: Properties) -> UserDirectory {
    let store: Arc<dyn RecordStore> = Arc::new(InMemory::new());
    UserDirectory::new(store, Arc::new(config)).with_hasher(cheap_hasher())
}

pub fn directory() -> UserDirectory {
    directory_with(admin_config())
}

/// Creates `username` with [`PASSWORD`] and the given groups.
pub fn create_user(directory: &UserDirectory, username: &str, groups: &[&str]) -> UserRecord {
    let mut data = props(&format!(r#"{{"email": "{username}@example.org"}}"#));
    data.set("password", PASSWORD).unwrap();
    data.set("groups", groups.to_vec()).unwrap();
    directory
        .create(username, &data)
        .expect("Failed to create user")
}

/// Loads `username` and logs in with [`PASSWORD`].
pub fn login(directory: &UserDirectory, username: &str) -> UserRecord {
    let mut user = directory.load(username).expect("Failed to load user");
    assert!(user.login(PASSWORD).expect("Login errored"), "Login refused");
    user
}
