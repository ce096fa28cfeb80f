//! Integration tests for the task board.

use bytes::Bytes;

use nextsteps_core::error::ErrorKind;
use nextsteps_entity::task::NewTask;
use nextsteps_service::ViewToggle;

use super::helpers::TestApp;

fn task(title: &str, department: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        department: department.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_department_visibility_by_role() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    app.create_staff(&manager, "Sam", &["Frozen"], "222222").await;

    let boss = app.login("123456").await;
    for (title, dept) in [("Rotate ice cream", "Frozen"), ("Face up beans", "Grocery")] {
        app.tasks.create_task(&boss, task(title, dept), None).await.unwrap();
    }

    let everything = app
        .tasks
        .visible_open_tasks(&boss, ViewToggle::Default)
        .await
        .unwrap();
    assert_eq!(everything.tasks.len(), 2);
    assert_eq!(everything.hidden, 0);

    let own = app
        .tasks
        .visible_open_tasks(&boss, ViewToggle::DepartmentOnly)
        .await
        .unwrap();
    assert_eq!(own.tasks.len(), 1);
    assert_eq!(own.tasks[0].department, "Grocery");
    assert_eq!(own.hidden, 1);

    app.session.logout().await;
    let sam = app.login("222222").await;
    let mine = app
        .tasks
        .visible_open_tasks(&sam, ViewToggle::Default)
        .await
        .unwrap();
    assert_eq!(mine.tasks.len(), 1);
    assert_eq!(mine.tasks[0].title, "Rotate ice cream");
    assert!(mine.has_hidden());

    let all = app
        .tasks
        .visible_open_tasks(&sam, ViewToggle::AllDepartments)
        .await
        .unwrap();
    assert_eq!(all.tasks.len(), 2);
}

#[tokio::test]
async fn test_complete_and_undo_flow() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    app.create_staff(&manager, "Sam", &["Grocery"], "222222").await;

    let sam = app.login("222222").await;
    let created = app
        .tasks
        .create_task(&sam, task("Fill milk", "Grocery"), None)
        .await
        .unwrap();
    assert!(!created.completed);
    assert!(created.created_at > 0);

    app.tasks.complete_task(&sam, &created.id).await.unwrap();
    let open = app
        .tasks
        .visible_open_tasks(&sam, ViewToggle::Default)
        .await
        .unwrap();
    assert!(open.tasks.is_empty());

    let err = app.tasks.recently_completed(&sam).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    let err = app.tasks.undo_complete(&sam, &created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    app.session.logout().await;
    let boss = app.login("123456").await;
    let done = app.tasks.recently_completed(&boss).await.unwrap();
    assert_eq!(done.len(), 1);
    assert!(done[0].completed_at.is_some());

    app.tasks.undo_complete(&boss, &created.id).await.unwrap();
    let reopened = app.tasks.get_task(&created.id).await.unwrap();
    assert!(!reopened.completed);
    assert!(reopened.completed_at.is_none());
    assert!(app.tasks.recently_completed(&boss).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_task_with_photo_gets_public_url() {
    let app = TestApp::new();
    app.create_manager("Priya", "123456").await;
    let boss = app.login("123456").await;

    let created = app
        .tasks
        .create_task(
            &boss,
            task("Broken shelf", "GM & HB"),
            Some(Bytes::from_static(b"\xff\xd8\xff")),
        )
        .await
        .unwrap();

    let paths = app.blobs.paths();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].starts_with("task-images/"));
    assert!(paths[0].ends_with(".jpg"));

    let url = created.image_url.expect("image url");
    assert!(url.starts_with(&app.config.storage.public_base_url));
    assert!(url.ends_with(&paths[0]));
}

#[tokio::test]
async fn test_missing_fields_write_nothing() {
    let app = TestApp::new();
    app.create_manager("Priya", "123456").await;
    let boss = app.login("123456").await;

    let err = app
        .tasks
        .create_task(&boss, task("", "Frozen"), Some(Bytes::from_static(b"img")))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app
        .tasks
        .create_task(&boss, task("Sweep", "Car Park"), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    assert!(app.blobs.paths().is_empty());
    let board = app
        .tasks
        .visible_open_tasks(&boss, ViewToggle::AllDepartments)
        .await
        .unwrap();
    assert!(board.tasks.is_empty());
}

#[tokio::test]
async fn test_live_feed_follows_writes_and_toggle() {
    let app = TestApp::new();
    let manager = app.create_manager("Priya", "123456").await;
    app.create_staff(&manager, "Sam", &["Frozen"], "222222").await;
    let sam = app.login("222222").await;

    let mut feed = app.tasks.open_feed(&sam, ViewToggle::Default).await.unwrap();
    let first = feed.next().await.unwrap().unwrap();
    assert!(first.tasks.is_empty());

    let frozen = app
        .tasks
        .create_task(&sam, task("Defrost freezer", "Frozen"), None)
        .await
        .unwrap();
    let second = feed.next().await.unwrap().unwrap();
    assert_eq!(second.tasks.len(), 1);

    app.tasks
        .create_task(&sam, task("Stack crisps", "Grocery"), None)
        .await
        .unwrap();
    let third = feed.next().await.unwrap().unwrap();
    assert_eq!(third.tasks.len(), 1);
    assert_eq!(third.hidden, 1);

    feed.toggle().set(ViewToggle::AllDepartments);
    let widened = feed.next().await.unwrap().unwrap();
    assert_eq!(widened.toggle, ViewToggle::AllDepartments);
    assert_eq!(widened.tasks.len(), 2);

    app.tasks.complete_task(&sam, &frozen.id).await.unwrap();
    let after = feed.next().await.unwrap().unwrap();
    assert_eq!(after.tasks.len(), 1);
    assert_eq!(after.tasks[0].title, "Stack crisps");

    let handle = feed.handle();
    feed.unsubscribe();
    assert!(!handle.is_active());
}
