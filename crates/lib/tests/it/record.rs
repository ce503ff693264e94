//! Record and store tests

use std::sync::Arc;

use tessera::{
    data::{Properties, Value},
    encoding::JsonEncoder,
    record::{FileStore, InMemory, Record, RecordStore, StorageError},
};

use crate::helpers::props;

#[test]
fn test_save_leaves_elements_as_source_of_truth() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemory::new());
    let mut record = Record::new("page", props(r#"{"title": "Home"}"#)).with_storage(store.clone());
    record.set_nested_property("meta.order", 1).unwrap();
    record.save().unwrap();

    assert_eq!(store.lookup("page").unwrap().as_ref(), Some(record.elements()));
    let reloaded = Record::load(store, "page", Properties::new()).unwrap();
    assert_eq!(reloaded.elements(), record.elements());
}

#[test]
fn test_save_without_store_is_unbound() {
    let mut record = Record::new("page", Properties::new());
    let err = record.save().unwrap_err();
    assert!(err.is_storage_error());
    assert!(matches!(err, tessera::Error::Storage(StorageError::Unbound { .. })));
}

#[test]
fn test_exists_tracks_persistence() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemory::new());
    let mut record = Record::load(store.clone(), "page", Properties::new()).unwrap();
    assert!(!record.exists());
    assert!(!record.delete().unwrap());

    record.save().unwrap();
    assert!(record.exists());
    assert!(record.delete().unwrap());
    assert!(!record.exists());
    assert!(!store.contains("page").unwrap());
}

#[test]
fn test_nested_accessors_delegate() {
    let mut record = Record::new("page", Properties::new());
    assert!(record.def_nested_property("meta.order", 3).unwrap());
    assert!(!record.def_nested_property("meta.order", 4).unwrap());
    assert_eq!(record.get_nested_property("meta.order", 0), Value::Int(3));
    assert_eq!(record.unset_nested_property("meta.order"), Some(Value::Int(3)));
    assert_eq!(record.get_nested_property("meta.order", 0), Value::Int(0));

    record.set_nested_property("meta", "flat").unwrap();
    let err = record.set_nested_property("meta.order", 1).unwrap_err();
    assert!(err.is_path_conflict());
}

#[test]
fn test_encode() {
    let record = Record::new("page", props(r#"{"title": "Home", "tags": ["a"]}"#));
    assert_eq!(
        record.encode(&JsonEncoder::compact()).unwrap(),
        r#"{"tags":["a"],"title":"Home"}"#
    );
}

#[test]
fn test_file_store_round_trips_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let elements = props(r#"{"email": "ada@example.org", "access": {"site": {"login": true}}}"#);

    {
        let store: Arc<dyn RecordStore> = Arc::new(FileStore::open(dir.path()).unwrap());
        let mut record = Record::new("ada", elements.clone()).with_storage(store);
        record.save().unwrap();
    }

    let store: Arc<dyn RecordStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let record = Record::load(store.clone(), "ada", Properties::new()).unwrap();
    assert!(record.exists());
    assert_eq!(record.elements(), &elements);
    assert_eq!(store.keys().unwrap(), vec!["ada".to_string()]);
    assert_eq!(
        store.search("ADA@example.org", "email").unwrap(),
        Some("ada".to_string())
    );
}

#[test]
fn test_in_memory_file_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");

    let store: Arc<dyn RecordStore> = Arc::new(InMemory::new());
    Record::new("ada", props(r#"{"state": "enabled"}"#))
        .with_storage(store.clone())
        .save()
        .unwrap();

    let memory = store.as_any().downcast_ref::<InMemory>().unwrap();
    memory.save_to_file(&path).unwrap();

    let loaded = InMemory::load_from_file(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(
        loaded.lookup("ada").unwrap(),
        Some(props(r#"{"state": "enabled"}"#))
    );
}
