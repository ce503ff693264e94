//! Nested property tree tests

use tessera::data::{DataError, Properties, Value};

use crate::helpers::props;

#[test]
fn test_set_then_get_returns_value() {
    let paths = ["a", "a2.b", "x.y.z.w", ".lead.trail.", "doubled..dots"];
    let mut tree = Properties::new();
    for (i, path) in paths.iter().enumerate() {
        let value = Value::Int(i as i64);
        tree.set(path, value.clone()).unwrap();
        assert_eq!(tree.get(path), Some(&value), "path {path}");
    }
    assert_eq!(tree.get("doubled.dots"), Some(&Value::Int(4)));
}

#[test]
fn test_unset_then_get_returns_default() {
    let mut tree = props(r#"{"access": {"site": {"login": true, "edit": true}}}"#);
    tree.unset("access.site.login");
    assert_eq!(tree.get_or("access.site.login", "none"), Value::from("none"));
    assert_eq!(tree.get("access.site.edit"), Some(&Value::Bool(true)));

    // Unsetting something absent is silent.
    assert_eq!(tree.unset("access.site.login"), None);
    assert_eq!(tree.unset("nothing.here"), None);
}

#[test]
fn test_def_keeps_existing_and_fills_absent() {
    let mut tree = props(r#"{"state": "disabled", "language": null}"#);
    assert!(!tree.def("state", "enabled").unwrap());
    assert_eq!(tree.get_text("state"), Some("disabled"));

    assert!(tree.def("language", "en").unwrap());
    assert_eq!(tree.get_text("language"), Some("en"));

    assert!(tree.def("access.site.login", false).unwrap());
    assert_eq!(tree.get("access.site.login"), Some(&Value::Bool(false)));
}

#[test]
fn test_get_does_not_mutate() {
    let tree = props(r#"{"a": {"b": 1}}"#);
    let before = tree.clone();
    assert_eq!(tree.get_or("a.c.d", 5), Value::Int(5));
    assert_eq!(tree.get_or("a.b.c", 5), Value::Int(5));
    assert_eq!(tree, before);
}

#[test]
fn test_path_conflict_on_list() {
    let mut tree = props(r#"{"groups": ["admin"]}"#);
    let err = tree.set("groups.first", "x").unwrap_err();
    assert!(err.is_path_conflict());
    assert_eq!(err.path(), "groups.first");
    assert_eq!(tree, props(r#"{"groups": ["admin"]}"#));
}

#[test]
fn test_crate_error_from_path_conflict() {
    let mut tree = props(r#"{"state": "enabled"}"#);
    let err: tessera::Error = tree.set("state.value", 1).unwrap_err().into();
    assert!(err.is_path_conflict());
    assert_eq!(err.module(), "data");
    assert!(matches!(err, tessera::Error::Data(DataError::PathConflict { .. })));
}

#[test]
fn test_json_round_trip_preserves_shape() {
    let json = r#"{"access":{"site":{"login":true}},"groups":["admin","editors"],"rating":4.5,"state":"enabled"}"#;
    let tree = props(json);
    assert_eq!(serde_json::to_string(&tree).unwrap(), json);
}
