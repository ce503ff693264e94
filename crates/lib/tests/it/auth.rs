//! Authorization tests

use std::sync::Arc;

use tessera::{
    auth::{AuthorizationEngine, Reason, is_positive},
    config::Config,
    data::Value,
};

use crate::helpers::*;

#[test]
fn test_group_grants_action() {
    let directory = directory();
    create_user(&directory, "ada", &["admin"]);
    let mut ada = login(&directory, "ada");

    assert!(ada.authorize("edit", Some("site")));
    assert!(ada.is_authorized());
    assert!(!ada.authorize("delete", Some("site")));
    assert!(!ada.is_authorized());
}

#[test]
fn test_direct_access_overrides_group() {
    let directory = directory();
    let mut ada = create_user(&directory, "ada", &["admin"]);
    ada.set_nested_property("access.site.edit", false).unwrap();
    ada.save().unwrap();

    let mut ada = login(&directory, "ada");
    assert!(!ada.authorize("edit", Some("site")));
    assert!(ada.authorize("login", Some("site")));
}

#[test]
fn test_direct_access_grants_without_group() {
    let directory = directory();
    let mut grace = create_user(&directory, "grace", &[]);
    grace.set_nested_property("access.admin.login", "on").unwrap();
    grace.save().unwrap();

    let mut grace = login(&directory, "grace");
    assert!(grace.authorize("login", Some("admin")));
    assert!(!grace.authorize("edit", Some("site")));
}

#[test]
fn test_unauthenticated_is_always_denied() {
    let directory = directory();
    let mut ada = create_user(&directory, "ada", &["admin"]);
    ada.set_nested_property("access.site.edit", true).unwrap();

    assert!(!ada.is_authenticated());
    assert!(!ada.authorize("edit", Some("site")));
    assert!(!ada.authorize("login", Some("admin")));
}

#[test]
fn test_disabled_account_is_denied() {
    let directory = directory();
    let mut ada = create_user(&directory, "ada", &["admin"]);
    ada.set_authenticated(true);
    assert!(ada.authorize("edit", Some("site")));

    ada.set_nested_property("state", "disabled").unwrap();
    assert!(!ada.authorize("edit", Some("site")));
}

#[test]
fn test_logout_clears_authorization() {
    let directory = directory();
    create_user(&directory, "ada", &["admin"]);
    let mut ada = login(&directory, "ada");
    assert!(ada.authorize("edit", Some("site")));

    ada.logout();
    assert!(!ada.is_authenticated());
    assert!(!ada.is_authorized());
    assert!(!ada.authorize("edit", Some("site")));
}

#[test]
fn test_engine_with_file_config() {
    let config = Config::from_json(
        r#"{"groups": {"editors": {"access": {"site": {"edit": "1"}}}}}"#,
    )
    .unwrap();
    let engine = AuthorizationEngine::new(Arc::new(config));
    let subject = props(r#"{"groups": ["guests", "editors"]}"#);

    let decision = engine.decide(&subject, "edit", Some("site"));
    assert!(decision.granted);
    assert_eq!(decision.reason, Reason::Group("editors".to_string()));
    assert!(!engine.authorize(&subject, "edit", None));
}

#[test]
fn test_is_positive_spellings() {
    assert!(is_positive(&Value::from("on")));
    assert!(is_positive(&Value::Int(1)));
    assert!(!is_positive(&Value::from("off")));
    assert!(!is_positive(&Value::Int(0)));
}
