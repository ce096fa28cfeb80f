//! Integration tests for colleague management.

use nextsteps_core::error::ErrorKind;
use nextsteps_entity::staff::StaffRole;
use nextsteps_service::ActorContext;

use super::helpers::{TestApp, new_staff};

#[tokio::test]
async fn test_bootstrap_only_on_empty_store() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    assert_eq!(manager.role, StaffRole::Manager);

    let err = app
        .staff
        .bootstrap_manager(new_staff("Mallory", &["Frozen"], "999999"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(!app.session.login("999999").await);
}

#[tokio::test]
async fn test_added_colleague_can_log_in() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    let sam = app
        .create_staff(&manager, "Sam", &["Frozen", "Dot Com"], "222222")
        .await;
    assert_eq!(sam.role, StaffRole::Staff);

    let ctx = app.login("222222").await;
    assert_eq!(ctx.staff, sam);
    assert!(!ctx.is_manager());
}

#[tokio::test]
async fn test_duplicate_pin_is_rejected() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    let boss = ActorContext::new(manager);

    let err = app
        .staff
        .add_colleague(&boss, new_staff("Sam", &["Frozen"], "123456"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let everyone = app.staff.list_colleagues(&boss).await.unwrap();
    assert_eq!(everyone.len(), 1);
}

#[tokio::test]
async fn test_staff_cannot_manage_colleagues() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    app.create_staff(&manager, "Sam", &["Frozen"], "222222").await;
    let sam = app.login("222222").await;

    let err = app
        .staff
        .add_colleague(&sam, new_staff("Tom", &["Frozen"], "333333"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let err = app.staff.list_colleagues(&sam).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_missing_department_is_validation_error() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;

    let err = app
        .staff
        .add_colleague(
            &ActorContext::new(manager),
            new_staff("Sam", &[], "222222"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(!app.session.login("222222").await);
}
