//! Blueprint tests: defaults, merging, validation and filtering

use tessera::{
    blueprint::{Blueprint, Field, FieldType, MergeStrategy, Violation},
    data::Value,
};

use crate::helpers::props;

fn article() -> Blueprint {
    Blueprint::builder("article")
        .field(Field::text("title").required().with_length(Some(3), Some(40)))
        .field(Field::text("status").with_options(["draft", "published"]).with_default("draft"))
        .field(Field::new("meta.rating", FieldType::Int).with_default(0))
        .field(Field::text("meta.slug").with_pattern("[a-z0-9-]+"))
        .field(Field::list("tags").with_merge(MergeStrategy::Append))
        .field(Field::list("authors"))
        .field(Field::map("options"))
        .build()
        .unwrap()
}

#[test]
fn test_defaults_placed_at_paths() {
    assert_eq!(
        article().get_defaults(),
        props(r#"{"status": "draft", "meta": {"rating": 0}}"#)
    );
}

#[test]
fn test_merge_is_idempotent() {
    let blueprint = article();
    let data = props(
        r#"{
            "title": "Hello",
            "meta": {"rating": 3, "slug": "hello"},
            "tags": ["a", "b"],
            "authors": ["ada"],
            "options": {"comments": {"enabled": true}},
            "undeclared": {"x": [1, 2]}
        }"#,
    );
    assert_eq!(blueprint.merge_data(&data, &data, None, '.').unwrap(), data);
}

#[test]
fn test_merge_strategies() {
    let blueprint = article();
    let old = props(
        r#"{"title": "Old", "tags": ["a"], "authors": ["ada"], "options": {"comments": {"enabled": true}}}"#,
    );
    let new = props(
        r#"{"title": "New", "tags": ["b", "a"], "authors": ["grace"], "options": {"comments": {"limit": 10}}}"#,
    );

    let merged = blueprint.merge_data(&old, &new, None, '.').unwrap();
    assert_eq!(merged.get_text("title"), Some("New"));
    assert_eq!(merged.get("tags").unwrap().text_items(), vec!["a", "b"]);
    assert_eq!(merged.get("authors").unwrap().text_items(), vec!["grace"]);
    assert_eq!(
        merged.get("options.comments.enabled"),
        Some(&Value::Bool(true))
    );
    assert_eq!(merged.get("options.comments.limit"), Some(&Value::Int(10)));

    // Inputs are untouched.
    assert_eq!(old.get_text("title"), Some("Old"));
}

#[test]
fn test_merge_type_error() {
    let blueprint = article();
    let old = props(r#"{"options": {"comments": true}}"#);

    let err = blueprint
        .merge_data(&old, &props(r#"{"options": "none"}"#), None, '.')
        .unwrap_err();
    assert!(err.is_merge_type_error());

    let err = blueprint
        .merge_data(&old, &props(r#"{"meta": 5}"#), None, '.')
        .unwrap_err();
    assert!(err.is_merge_type_error());
}

#[test]
fn test_scoped_merge() {
    let blueprint = article();
    let old = props(r#"{"title": "Keep", "meta": {"rating": 1, "slug": "keep"}}"#);
    let merged = blueprint
        .merge_data(&old, &props(r#"{"rating": 5}"#), Some("meta"), '.')
        .unwrap();
    assert_eq!(
        merged,
        props(r#"{"title": "Keep", "meta": {"rating": 5, "slug": "keep"}}"#)
    );

    let merged = blueprint
        .merge_data(&old, &props(r#"{"slug": "other"}"#), Some("meta"), '/')
        .unwrap();
    assert_eq!(merged.get_text("meta.slug"), Some("other"));
}

#[test]
fn test_validate_reports_every_violation() {
    let blueprint = article();
    let data = props(
        r#"{"status": "archived", "meta": {"rating": "high", "slug": "Not A Slug"}, "tags": "one"}"#,
    );
    let err = blueprint.validate(&data).unwrap_err();
    let validation = err.validation().unwrap();

    let fields: Vec<&str> = validation.violations.iter().map(Violation::field).collect();
    assert_eq!(
        fields,
        vec!["meta.rating", "meta.slug", "status", "tags", "title"]
    );
    assert!(matches!(
        validation.for_field("title").next(),
        Some(Violation::Missing { .. })
    ));
    assert!(matches!(
        validation.for_field("status").next(),
        Some(Violation::Options { .. })
    ));
}

#[test]
fn test_validate_accepts_valid_data() {
    let data = props(r#"{"title": "Hello", "status": "published", "meta": {"slug": "hello-world"}}"#);
    assert!(article().validate(&data).is_ok());
}

#[test]
fn test_filter_extra_split_rebuilds_data() {
    let blueprint = article();
    let data = props(
        r#"{
            "title": "Hello",
            "meta": {"rating": 2, "legacy": true},
            "options": {"anything": {"goes": 1}},
            "undeclared": [1, 2]
        }"#,
    );

    let filtered = blueprint.filter(&data);
    let extra = blueprint.extra(&data);
    assert_eq!(
        filtered,
        props(r#"{"title": "Hello", "meta": {"rating": 2}, "options": {"anything": {"goes": 1}}}"#)
    );
    assert_eq!(extra, props(r#"{"meta": {"legacy": true}, "undeclared": [1, 2]}"#));
    assert_eq!(filtered.merge(&extra), data);
    assert_eq!(blueprint.filter(&filtered.merge(&extra)), filtered);
}

#[test]
fn test_blueprint_from_json() {
    let blueprint = Blueprint::from_json(
        r#"{
            "name": "profile",
            "fields": [
                {"name": "nickname", "type": "text", "max_length": 8},
                {"name": "links", "type": "list", "merge": "append"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(blueprint.name(), "profile");
    assert_eq!(
        blueprint.field("links").unwrap().merge_strategy(),
        MergeStrategy::Append
    );
    assert!(
        blueprint
            .validate(&props(r#"{"nickname": "far too long"}"#))
            .is_err()
    );
}

#[test]
fn test_user_blueprint() {
    let blueprint = Blueprint::user();
    assert_eq!(blueprint.get_defaults(), props(r#"{"state": "enabled"}"#));
    let err = blueprint
        .validate(&props(r#"{"username": "ada", "state": "locked"}"#))
        .unwrap_err();
    let fields: Vec<&str> = err
        .validation()
        .unwrap()
        .violations
        .iter()
        .map(Violation::field)
        .collect();
    assert_eq!(fields, vec!["email", "state"]);
}
