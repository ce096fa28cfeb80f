//! Integration tests for PIN login and session restore.

use chrono::Duration;

use nextsteps_auth::session::manager::{SESSION_EXPIRED_BODY, SESSION_EXPIRED_TITLE};
use nextsteps_core::traits::{KeyValueStore, NoticeLevel};

use super::helpers::TestApp;

#[tokio::test]
async fn test_login_then_restart_restores_identity() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;

    assert!(app.session.login("123456").await);
    assert_eq!(app.session.current_identity(), Some(manager.clone()));

    let restarted = app.restart();
    assert!(restarted.current_identity().is_none());
    let restored = restarted.restore().await;
    assert_eq!(restored, Some(manager));
    assert!(app.notices.drain().is_empty());
}

#[tokio::test]
async fn test_invalid_pin_leaves_state_untouched() {
    let app = TestApp::new();
    app.create_manager("Priya", "123456").await;

    assert!(!app.session.login("654321").await);
    assert!(!app.session.login("12345").await);
    assert!(!app.session.login("").await);
    assert!(app.session.current_identity().is_none());
    assert!(
        !app.local
            .exists(&app.config.session.storage_key)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_wrong_pin_keeps_current_session() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    let colleague = app
        .create_staff(&manager, "Sam", &["Frozen"], "222222")
        .await;
    app.login("222222").await;

    let key = &app.config.session.storage_key;
    let cached = app.local.get(key).await.unwrap().expect("cached session");

    assert!(!app.session.login("999999").await);
    assert!(!app.session.login("abc").await);

    assert_eq!(app.session.current_identity(), Some(colleague.clone()));
    assert_eq!(app.local.get(key).await.unwrap(), Some(cached));
    assert_eq!(app.restart().restore().await, Some(colleague));
}

#[tokio::test]
async fn test_expired_session_is_dropped_with_notice() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    app.seed_session(&manager, Duration::hours(3) + Duration::minutes(1))
        .await;

    let restarted = app.restart();
    assert!(restarted.restore().await.is_none());
    assert!(restarted.current_identity().is_none());
    assert!(
        !app.local
            .exists(&app.config.session.storage_key)
            .await
            .unwrap()
    );

    let notices = app.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(notices[0].title, SESSION_EXPIRED_TITLE);
    assert_eq!(notices[0].body, SESSION_EXPIRED_BODY);
}

#[tokio::test]
async fn test_session_just_inside_ttl_is_restored() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    app.seed_session(&manager, Duration::hours(2) + Duration::minutes(59))
        .await;

    let restarted = app.restart();
    assert_eq!(restarted.restore().await, Some(manager));
    assert!(app.notices.drain().is_empty());
}

#[tokio::test]
async fn test_logout_clears_cache_and_is_idempotent() {
    let app = TestApp::new();
    app.create_manager("Priya", "123456").await;
    app.login("123456").await;

    let mut identity = app.session.watch_identity();
    app.session.logout().await;
    identity.changed().await.unwrap();
    assert!(identity.borrow().is_none());

    app.session.logout().await;
    assert!(app.restart().restore().await.is_none());
}
