//! Registration, login and password storage.

mod common;

use common::{PASSWORD, TestHarness};
use game_tracker_lib::entity::prelude::Users;
use game_tracker_lib::error::TrackerError;
use game_tracker_lib::utils::crypto::check_password;
use sea_orm::EntityTrait;

#[tokio::test]
async fn register_then_login_returns_session() {
    let harness = TestHarness::new().await;
    let user = harness
        .service
        .register(&TestHarness::new_user("ada"))
        .await
        .unwrap();
    assert!(user.last_access_date.is_none());

    let session = harness.service.login("ada", PASSWORD).await.unwrap();
    assert_eq!(session.user_id(), user.id);
    assert_eq!(session.username(), "ada");
    assert_eq!(session.first_name(), "ada-first");
    assert!(session.search_results().is_none());
}

#[tokio::test]
async fn password_is_stored_salted_and_hashed() {
    let harness = TestHarness::new().await;
    let user = harness
        .service
        .register(&TestHarness::new_user("ada"))
        .await
        .unwrap();

    let (salt, hash) = user.password.split_once(':').unwrap();
    assert_eq!(salt.len(), 32);
    assert_eq!(hash.len(), 64);
    assert_ne!(user.password, PASSWORD);
    assert!(check_password(&user.password, PASSWORD));
}

#[tokio::test]
async fn login_updates_last_access() {
    let harness = TestHarness::new().await;
    let session = harness.user("ada").await;

    let stored = Users::find_by_id(session.user_id())
        .one(harness.db())
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_access_date.is_some());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let harness = TestHarness::new().await;
    harness.user("ada").await;

    let wrong = harness.service.login("ada", "nope").await.unwrap_err();
    let unknown = harness.service.login("grace", PASSWORD).await.unwrap_err();
    assert!(matches!(wrong, TrackerError::InvalidCredentials));
    assert_eq!(wrong.to_string(), unknown.to_string());
    assert_eq!(wrong.to_string(), "Invalid username or password.");
}

#[tokio::test]
async fn login_requires_both_fields() {
    let harness = TestHarness::new().await;
    let err = harness.service.login("  ", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter both username and password.");
    let err = harness.service.login("ada", "").await.unwrap_err();
    assert!(matches!(err, TrackerError::Validation(_)));
}

#[tokio::test]
async fn registration_requires_every_field() {
    let harness = TestHarness::new().await;
    let mut input = TestHarness::new_user("ada");
    input.last_name = String::new();

    let err = harness.service.register(&input).await.unwrap_err();
    assert_eq!(err.to_string(), "Please fill in all fields.");
}

#[tokio::test]
async fn duplicate_username_or_email_is_rejected() {
    let harness = TestHarness::new().await;
    harness.user("ada").await;

    let same_name = TestHarness::new_user("ada");
    let err = harness.service.register(&same_name).await.unwrap_err();
    assert_eq!(err.to_string(), "Username or email already exists.");

    let mut same_email = TestHarness::new_user("grace");
    same_email.email = "ada@example.com".to_string();
    let err = harness.service.register(&same_email).await.unwrap_err();
    assert!(matches!(err, TrackerError::Conflict(_)));
}

#[tokio::test]
async fn logout_drops_cached_results() {
    let harness = TestHarness::new().await;
    let mut session = harness.user("ada").await;
    let results = harness
        .service
        .search(&session, &Default::default())
        .await
        .unwrap();
    session.cache_search(results);

    harness.service.logout(session);
    let fresh = harness.service.login("ada", PASSWORD).await.unwrap();
    assert!(fresh.search_results().is_none());
}
