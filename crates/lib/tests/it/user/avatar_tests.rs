//! Avatar resolution tests

use std::sync::Arc;

use tessera::{
    data::Properties,
    user::{MediaFolder, gravatar_url},
};
use url::Url;

use crate::helpers::*;

#[test]
fn test_gravatar_fallback() {
    let directory = directory();
    let ada = create_user(&directory, "ada", &[]);
    assert_eq!(ada.avatar_url(), gravatar_url("ada@example.org"));
    assert_eq!(ada.avatar_url(), gravatar_url(" ADA@example.org"));
    assert!(ada.avatar_media().is_none());
}

#[test]
fn test_provider_avatar_by_name() {
    let directory = directory();
    let mut ada = create_user(&directory, "ada", &[]);
    ada.set_nested_property("provider", "github").unwrap();
    ada.set_nested_property("github.avatar_url", "https://avatars.example.com/ada.png")
        .unwrap();
    assert_eq!(ada.avatar_url(), "https://avatars.example.com/ada.png");
}

#[test]
fn test_provider_avatar_inline() {
    let directory = directory();
    let mut ada = create_user(&directory, "ada", &[]);
    ada.set_nested_property("provider.name", "gitlab").unwrap();
    ada.set_nested_property("provider.avatar_url", "https://gitlab.example.com/ada.png")
        .unwrap();
    assert_eq!(ada.avatar_url(), "https://gitlab.example.com/ada.png");
}

#[test]
fn test_provider_avatar_field_fallback() {
    let directory = directory();
    let mut ada = create_user(&directory, "ada", &[]);
    ada.set_nested_property("provider", "github").unwrap();
    ada.set_nested_property("github.avatar_url", "").unwrap();
    ada.set_nested_property("github.avatar", "https://avatars.example.com/gh-ada.png")
        .unwrap();
    assert_eq!(ada.avatar_url(), "https://avatars.example.com/gh-ada.png");
}

#[test]
fn test_no_email_means_no_avatar() {
    let directory = directory();
    let mut ghost = directory.load("ghost").unwrap();
    assert_eq!(ghost.avatar_url(), "");

    ghost.set_nested_property("email", "   ").unwrap();
    assert_eq!(ghost.avatar_url(), "");
}

#[test]
fn test_uploaded_avatar_wins() {
    let media_dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(media_dir.path().join("thumbs")).unwrap();
    std::fs::write(media_dir.path().join("ada.png"), b"png").unwrap();
    std::fs::write(media_dir.path().join("thumbs/ada.png"), b"p").unwrap();

    let folder = MediaFolder::new(
        media_dir.path(),
        Url::parse("https://cdn.example.org/accounts/avatars/").unwrap(),
    )
    .unwrap();
    let directory = directory().with_media(Arc::new(folder));

    let mut ada = create_user(&directory, "ada", &[]);
    ada.set_nested_property("provider", "github").unwrap();
    ada.set_nested_property("github.avatar_url", "https://avatars.example.com/ada.png")
        .unwrap();
    ada.record_mut().set_property(
        "avatar",
        props(r#"{"user/accounts/avatars/ada.png": {"name": "ada.png", "type": "image/png"}}"#),
    );

    assert_eq!(
        ada.avatar_url(),
        "https://cdn.example.org/accounts/avatars/ada.png"
    );
    let media = ada.avatar_media().unwrap();
    assert_eq!(
        media.thumbnail.unwrap().url(),
        "https://cdn.example.org/accounts/avatars/thumbs/ada.png"
    );
}

#[test]
fn test_missing_upload_falls_back_to_provider() {
    let media_dir = tempfile::tempdir().unwrap();
    let folder = MediaFolder::new(
        media_dir.path(),
        Url::parse("https://cdn.example.org/avatars/").unwrap(),
    )
    .unwrap();
    let directory = directory().with_media(Arc::new(folder));

    let mut ada = create_user(&directory, "ada", &[]);
    ada.set_nested_property("avatar.gone", Properties::new())
        .unwrap();
    ada.set_nested_property("provider.avatar_url", "https://avatars.example.com/ada.png")
        .unwrap();
    assert_eq!(ada.avatar_url(), "https://avatars.example.com/ada.png");
}
