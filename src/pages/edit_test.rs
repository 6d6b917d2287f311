use super::*;
use crate::error::ValidationError;
use crate::models::Profile;
use crate::state::profile_form::ListField;
use crate::state::test_helpers::{MockBackend, SESSION_USER, test_context};
use serde_json::json;

fn seeded_backend() -> std::sync::Arc<MockBackend> {
    let backend = MockBackend::new();
    let profile: Profile = serde_json::from_value(json!({
        "firstName": "Alice",
        "lastName": "Rao",
        "email": "alice@au.edu",
        "bio": "hello",
        "socialLinks": { "github": "https://github.com/alice" }
    }))
    .unwrap();
    backend.with(|d| d.profiles.insert(SESSION_USER.into(), profile));
    backend
}

#[tokio::test]
async fn mount_loads_profile_into_form() {
    let editor = ProfileEditor::mount(&test_context(seeded_backend())).await.unwrap();
    let form = editor.form.snapshot();
    assert_eq!(form.first_name, "Alice");
    assert_eq!(form.social_links.len(), 1);
    assert!(!editor.status.snapshot().loading);
}

#[tokio::test]
async fn failed_load_sets_error() {
    let editor = ProfileEditor::mount(&test_context(MockBackend::new())).await.unwrap();
    let status = editor.status.snapshot();
    assert!(status.error.is_some());
    assert!(!status.loading);
}

#[tokio::test]
async fn save_writes_backend_names_and_routes_to_profile() {
    let backend = seeded_backend();
    let editor = ProfileEditor::mount(&test_context(backend.clone())).await.unwrap();
    editor.form.update(|f| {
        f.add_entry(ListField::Experiences);
        f.set_entry(ListField::Experiences, 0, "TA");
        f.add_entry(ListField::SocialLinks);
    });

    assert_eq!(editor.save().await.unwrap(), Route::Profile(None));
    let saved = backend.with(|d| d.profiles[SESSION_USER].clone());
    assert_eq!(saved.professional_experiences, vec!["TA"]);
    assert_eq!(saved.social_links.len(), 1);
    assert_eq!(saved.extra.get("bio"), Some(&json!("hello")));
}

#[tokio::test]
async fn invalid_form_issues_no_request() {
    let backend = seeded_backend();
    let editor = ProfileEditor::mount(&test_context(backend.clone())).await.unwrap();
    editor.form.update(|f| f.set_field("email", ""));

    let err = editor.save().await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(ValidationError::MissingRequiredFields)));
    assert_eq!(backend.call_count("update_profile"), 0);
    assert_eq!(editor.status.snapshot().error.as_deref(), Some("Please fill in all required fields."));
}

#[tokio::test]
async fn photo_upload_stores_absolute_url_and_persists() {
    let backend = seeded_backend();
    let editor = ProfileEditor::mount(&test_context(backend.clone())).await.unwrap();

    let url = editor.upload_photo(PhotoKind::Cover, "c.png", vec![1, 2, 3]).await.unwrap();
    assert_eq!(url, "http://backend.test/uploads/cover/c.png");
    assert_eq!(editor.form.snapshot().cover_photo, url);
    assert_eq!(backend.with(|d| d.profiles[SESSION_USER].cover_photo.clone()), url);
    assert!(editor.status.snapshot().uploading.is_none());
}

#[tokio::test]
async fn persist_failure_after_upload_still_returns_url() {
    let backend = seeded_backend();
    backend.fail("update_profile");
    let editor = ProfileEditor::mount(&test_context(backend)).await.unwrap();

    let url = editor.upload_photo(PhotoKind::Profile, "p.jpg", Vec::new()).await.unwrap();
    assert_eq!(editor.form.snapshot().profile_photo, url);
}

#[tokio::test]
async fn failed_upload_leaves_form_alone() {
    let backend = seeded_backend();
    backend.fail("upload_photo");
    let editor = ProfileEditor::mount(&test_context(backend)).await.unwrap();

    assert!(editor.upload_photo(PhotoKind::Profile, "p.jpg", Vec::new()).await.is_err());
    assert!(editor.form.snapshot().profile_photo.is_empty());
    let error = editor.status.snapshot().error.unwrap();
    assert!(error.starts_with("Failed to upload profile photo"));
}

#[tokio::test]
async fn base64_upload_returns_url() {
    let editor = ProfileEditor::mount(&test_context(seeded_backend())).await.unwrap();
    let url = editor.upload_base64("data:image/png;base64,AAAA", PhotoKind::Profile).await.unwrap();
    assert_eq!(url, "https://cdn.test/profile.png");
}
