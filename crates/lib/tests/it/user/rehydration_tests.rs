//! Snapshot and rehydration tests

use std::sync::Arc;

use tessera::{
    data::Properties,
    record::{InMemory, RecordStore, Snapshot, StorageDescriptor},
    user::{Registry, UserDirectory},
};

use crate::helpers::*;

#[test]
fn test_snapshot_round_trip_rebinds_storage() {
    let directory = directory();
    create_user(&directory, "ada", &["admin"]);
    let mut ada = login(&directory, "ada");
    ada.set_nested_property("title", "Countess").unwrap();

    let json = ada.snapshot().to_json().unwrap();
    assert!(!json.contains("authenticated"));

    let registry = Registry::new().with_users(directory.clone());
    let mut restored = registry.rehydrate(&Snapshot::from_json(&json).unwrap()).unwrap();

    assert!(restored.exists());
    assert_eq!(restored.elements(), ada.elements());
    assert!(!restored.is_authenticated());

    restored.save().unwrap();
    assert_eq!(
        directory.store().lookup("ada").unwrap().unwrap().get_text("title"),
        Some("Countess")
    );
}

#[test]
fn test_stale_storage_descriptor_is_ignored() {
    let directory = directory();
    let snapshot = Snapshot {
        type_id: "user".to_string(),
        key: "grace".to_string(),
        elements: props(r#"{"username": "grace", "email": "grace@example.org", "authorized": true}"#),
        storage: Some(StorageDescriptor {
            store: "file:/srv/old-accounts".to_string(),
            key: "someone-else".to_string(),
        }),
    };

    let mut grace = Registry::new()
        .with_users(directory.clone())
        .rehydrate(&snapshot)
        .unwrap();
    assert!(!grace.exists());
    assert!(!grace.elements().contains("authorized"));
    assert!(!grace.is_authorized());

    grace.save().unwrap();
    assert!(directory.store().contains("grace").unwrap());
    assert!(!directory.store().contains("someone-else").unwrap());
}

#[test]
fn test_unknown_type_is_configuration_error() {
    let registry = Registry::new().with_users(directory());
    let snapshot = Snapshot {
        type_id: "page".to_string(),
        key: "home".to_string(),
        elements: Properties::new(),
        storage: None,
    };

    let err = registry.rehydrate(&snapshot).unwrap_err();
    assert!(err.is_configuration_error());

    let err = Registry::new()
        .rehydrate(&Snapshot {
            type_id: "user".to_string(),
            ..snapshot
        })
        .unwrap_err();
    assert!(err.is_configuration_error());
}

#[test]
fn test_directory_rejects_foreign_snapshot() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemory::new());
    let directory = UserDirectory::new(store, Arc::new(Properties::new()));
    let snapshot = Snapshot::from_json(r#"{"type": "page", "key": "home"}"#).unwrap();
    assert!(directory.rehydrate(&snapshot).unwrap_err().is_configuration_error());
}

#[test]
fn test_type_must_match_exactly() {
    let directory = directory();
    let registry = Registry::new().with_users(directory.clone());
    for type_id in ["users", "User"] {
        let snapshot = Snapshot {
            type_id: type_id.to_string(),
            key: "ada".to_string(),
            elements: Properties::new(),
            storage: None,
        };
        assert!(registry.rehydrate(&snapshot).unwrap_err().is_configuration_error());
        assert!(directory.rehydrate(&snapshot).unwrap_err().is_configuration_error());
    }
}
