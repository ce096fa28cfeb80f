//! Integration tests for the setup-link flow.

use chrono::{Duration, Utc};
use serde_json::json;

use nextsteps_core::error::ErrorKind;
use nextsteps_core::traits::DocumentStore;
use nextsteps_entity::collections;
use nextsteps_entity::invitation::NewInvitation;
use nextsteps_entity::staff::StaffRole;
use nextsteps_service::invitation::token_from_link;

use super::helpers::TestApp;

fn invitation(name: &str, departments: &[&str]) -> NewInvitation {
    NewInvitation {
        name: name.to_string(),
        departments: departments.iter().map(|d| d.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_link_to_login_round_trip() {
    let app = TestApp::new();
    app.create_manager("Priya", "123456").await;
    let boss = app.login("123456").await;

    let link = app
        .invitations
        .generate_link(&boss, invitation("Sam", &["Clothing", "Services"]))
        .await
        .unwrap();
    assert!(link.url.starts_with(&app.config.invitation.setup_base_url));
    assert_eq!(app.invitations.pending(&boss).await.unwrap().len(), 1);

    let token = token_from_link(&link.url).unwrap();
    assert_eq!(token, link.token);
    let setup = app.invitations.lookup(&token).await.unwrap();
    assert_eq!(setup.name, "Sam");

    let sam = app.invitations.claim(setup, "424242").await.unwrap();
    assert_eq!(sam.id, link.token);
    assert_eq!(sam.role, StaffRole::Staff);
    assert_eq!(sam.departments, vec!["Clothing", "Services"]);
    assert!(app.invitations.pending(&boss).await.unwrap().is_empty());

    app.session.logout().await;
    let ctx = app.login("424242").await;
    assert_eq!(ctx.staff_id(), link.token);

    let err = app.invitations.lookup(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_taken_pin_keeps_invitation_open() {
    let app = TestApp::new();
    app.create_manager("Priya", "123456").await;
    let boss = app.login("123456").await;
    let link = app
        .invitations
        .generate_link(&boss, invitation("Sam", &["Frozen"]))
        .await
        .unwrap();

    let setup = app.invitations.lookup(&link.token).await.unwrap();
    let err = app
        .invitations
        .claim(setup.clone(), "123456")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(app.invitations.pending(&boss).await.unwrap().len(), 1);

    app.invitations.claim(setup, "555555").await.unwrap();
    assert!(app.invitations.pending(&boss).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_expired_link_is_removed() {
    let app = TestApp::new();
    app.create_manager("Priya", "123456").await;
    let boss = app.login("123456").await;

    let created_at = (Utc::now() - Duration::days(8)).timestamp_millis();
    let fields = json!({
        "token": "stale-token",
        "name": "Sam",
        "department": "Frozen",
        "createdAt": created_at,
    });
    app.documents
        .set_at(
            collections::PENDING_INVITATIONS,
            "stale",
            fields.as_object().cloned().unwrap(),
        )
        .await
        .unwrap();

    let err = app.invitations.lookup("stale-token").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.invitations.pending(&boss).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_setup_links_need_a_manager_and_a_token() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    app.create_staff(&manager, "Sam", &["Frozen"], "222222").await;
    let sam = app.login("222222").await;

    let err = app
        .invitations
        .generate_link(&sam, invitation("Tom", &["Frozen"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let err = app.invitations.lookup("").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = token_from_link("https://tesco-three.vercel.app/setup").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
