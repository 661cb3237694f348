//! Integration tests for the task store and the mutation path

mod common;

use std::time::Duration;

use chrono::NaiveDate;
use common::{task_json, TestContext};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use taskdeck_client::{ClientError, Navigate, SubtaskRef, ViewScope};
use taskdeck_core::{board_columns, StatusCounts, TaskInput, TaskPatch, TaskStatus};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn task_with_subtask(completed: bool) -> serde_json::Value {
    json!({
        "id": 3,
        "title": "Ship release",
        "status": "IN_PROGRESS",
        "priority": "HIGH",
        "subtasks": [
            { "id": 11, "title": "Tag version", "completed": completed },
            { "id": 12, "title": "Publish notes", "completed": false }
        ],
        "comments": []
    })
}

#[tokio::test]
async fn test_load_all_replaces_collection() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(header("authorization", "Bearer tok-alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json(1, "First", "TODO"),
            task_json(2, "Second", "DONE")
        ])))
        .up_to_n_times(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([task_json(2, "Second", "DONE")])),
        )
        .mount(&ctx.server)
        .await;

    let tasks = ctx.client.tasks().load_all().await.unwrap();
    assert_eq!(StatusCounts::from_tasks(&tasks).completion_rate(), 50.0);

    ctx.client.tasks().load_all().await.unwrap();
    let ids: Vec<_> = ctx.client.tasks().tasks().await.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2]);
    assert!(ctx.client.tasks().get(1).await.is_none());
}

#[tokio::test]
async fn test_load_all_failure_keeps_previous_collection() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([task_json(1, "First", "TODO")])),
        )
        .up_to_n_times(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Database unavailable" })),
        )
        .mount(&ctx.server)
        .await;

    ctx.client.tasks().load_all().await.unwrap();
    let err = ctx.client.tasks().load_all().await.unwrap_err();

    assert!(matches!(err, ClientError::Server { status: 500, .. }));
    assert_eq!(err.to_string(), "Database unavailable");
    assert_eq!(ctx.client.tasks().len().await, 1);
    assert_eq!(
        ctx.client.tasks().error().await.as_deref(),
        Some("Database unavailable")
    );
    // Still logged in: only 401 ends the session
    assert!(ctx.client.session().handle().is_authenticated().await);
}

#[tokio::test]
async fn test_load_one_shares_entries_with_list() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([task_json(3, "Ship release", "TODO")])),
        )
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_with_subtask(false)))
        .mount(&ctx.server)
        .await;

    ctx.client.tasks().load_all().await.unwrap();
    let detail = ctx.client.tasks().load_one(3).await.unwrap();

    assert_eq!(detail.subtasks.len(), 2);
    let listed = ctx.client.tasks().tasks().await;
    assert_eq!(listed, vec![detail]);
}

#[tokio::test]
async fn test_missing_task_is_not_found() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.server)
        .await;

    let err = ctx.client.tasks().load_one(99).await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound(_)));
    assert!(ctx.client.session().handle().is_authenticated().await);
}

#[rstest]
#[case::empty_title("", None, "title", "Title is required")]
#[case::whitespace_title("   ", None, "title", "Title is required")]
#[case::two_chars("ab", None, "title", "Title must be at least 3 characters")]
#[case::long_description(
    "Valid",
    Some(501),
    "description",
    "Description must be less than 500 characters"
)]
#[tokio::test]
async fn test_create_task_validation_sends_nothing(
    #[case] title: &str,
    #[case] description_len: Option<usize>,
    #[case] field: &str,
    #[case] message: &str,
) {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let input = TaskInput {
        title: title.to_string(),
        description: "x".repeat(description_len.unwrap_or(0)),
        ..Default::default()
    };
    let err = ctx.client.mutations().create_task(&input).await.unwrap_err();

    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, field);
    assert_eq!(errors[0].message, message);
    assert_eq!(ctx.hits("POST", "/tasks").await, 0);
}

#[tokio::test]
async fn test_create_task_reports_every_violation() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;

    let input = TaskInput {
        title: "ab".to_string(),
        description: "x".repeat(600),
        due_date: NaiveDate::from_ymd_opt(2024, 6, 14),
        ..Default::default()
    };
    let err = ctx.client.mutations().create_task(&input).await.unwrap_err();

    let fields: Vec<_> = err
        .validation_errors()
        .unwrap()
        .iter()
        .map(|e| e.field.as_str())
        .collect();
    assert_eq!(fields, vec!["title", "description", "dueDate"]);
    assert_eq!(ctx.hits("POST", "/tasks").await, 0);
}

#[tokio::test]
async fn test_create_task_navigates_to_detail() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_partial_json(json!({
            "title": "Abc",
            "dueDate": "2024-06-15",
            "priority": "HIGH",
            "status": "TODO"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_json(42, "Abc", "TODO")))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let input = TaskInput {
        title: "Abc".to_string(),
        due_date: Some(common::today()),
        priority: taskdeck_core::Priority::High,
        ..Default::default()
    };
    let next = ctx.client.mutations().create_task(&input).await.unwrap();

    assert_eq!(next, Navigate::TaskDetail(42));
    assert!(ctx.client.tasks().get(42).await.is_some());
}

#[tokio::test]
async fn test_update_task_sends_full_replacement() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(5, "Draft", "TODO")))
        .up_to_n_times(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/5"))
        .and(body_partial_json(json!({
            "id": 5,
            "title": "Final",
            "status": "TODO",
            "priority": "MEDIUM"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(5, "Final", "TODO")))
        .mount(&ctx.server)
        .await;

    let patch = TaskPatch {
        title: Some("Final".to_string()),
        ..Default::default()
    };
    let updated = ctx.client.mutations().update_task(5, &patch).await.unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(ctx.client.tasks().get(5).await.unwrap().title, "Final");
}

#[tokio::test]
async fn test_delete_task_removes_from_store() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json(1, "Keep", "TODO"),
            task_json(2, "Drop", "TODO")
        ])))
        .mount(&ctx.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.server)
        .await;

    ctx.client.tasks().load_all().await.unwrap();
    let next = ctx.client.mutations().delete_task(2).await.unwrap();

    assert_eq!(next, Navigate::TaskList);
    assert!(ctx.client.tasks().get(2).await.is_none());
    assert_eq!(ctx.client.tasks().len().await, 1);
}

#[tokio::test]
async fn test_move_task_lands_in_new_column_after_reload() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([task_json(7, "Review", "IN_PROGRESS")])),
        )
        .up_to_n_times(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/7"))
        .and(body_partial_json(json!({ "id": 7, "title": "Review", "status": "DONE" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([task_json(7, "Review", "DONE")])),
        )
        .mount(&ctx.server)
        .await;

    ctx.client.tasks().load_all().await.unwrap();
    ctx.client
        .mutations()
        .move_task(7, TaskStatus::Done)
        .await
        .unwrap();

    let tasks = ctx.client.tasks().tasks().await;
    let columns = board_columns(&tasks);
    let ids = |status: TaskStatus| -> Vec<i64> {
        columns
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.tasks.iter().map(|t| t.id).collect())
            .unwrap_or_default()
    };
    assert_eq!(ids(TaskStatus::Done), vec![7]);
    assert!(ids(TaskStatus::InProgress).is_empty());
    assert_eq!(ctx.hits("GET", "/tasks").await, 2);
}

#[tokio::test]
async fn test_failed_move_leaves_task_in_place() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([task_json(7, "Review", "IN_PROGRESS")])),
        )
        .mount(&ctx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/7"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.server)
        .await;

    ctx.client.tasks().load_all().await.unwrap();
    let err = ctx
        .client
        .mutations()
        .move_task(7, TaskStatus::Done)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Server { status: 500, .. }));
    assert_eq!(
        ctx.client.tasks().get(7).await.unwrap().status,
        TaskStatus::InProgress
    );
}

#[rstest]
#[case::by_id(SubtaskRef::Id(11))]
#[case::by_index(SubtaskRef::Index(0))]
#[tokio::test]
async fn test_toggle_subtask_negates_completion(#[case] subtask: SubtaskRef) {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_with_subtask(false)))
        .up_to_n_times(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/3/subtasks/11"))
        .and(body_json(json!({ "completed": true })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_with_subtask(true)))
        .mount(&ctx.server)
        .await;

    let before = ctx.client.tasks().load_one(3).await.unwrap();
    let current = before.subtasks[0].completed;

    let after = ctx
        .client
        .mutations()
        .toggle_subtask(3, subtask, current)
        .await
        .unwrap();

    assert_eq!(after.subtasks[0].completed, !current);
    assert_eq!(after.completed_subtasks(), 1);
}

#[tokio::test]
async fn test_toggle_subtask_out_of_range() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_with_subtask(false)))
        .mount(&ctx.server)
        .await;

    let err = ctx
        .client
        .mutations()
        .toggle_subtask(3, SubtaskRef::Index(5), false)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(ctx.hits("PUT", "/tasks/3/subtasks/11").await, 0);
}

#[tokio::test]
async fn test_add_subtask_and_comment() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("POST"))
        .and(path("/tasks/3/subtasks"))
        .and(body_json(json!({ "title": "Write changelog", "completed": false })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks/3/comments"))
        .and(body_json(json!({ "text": "Looks good" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_with_subtask(false)))
        .mount(&ctx.server)
        .await;

    ctx.client
        .mutations()
        .add_subtask(3, "  Write changelog ")
        .await
        .unwrap();
    ctx.client
        .mutations()
        .add_comment(3, "Looks good")
        .await
        .unwrap();

    let blank = ctx.client.mutations().add_comment(3, "   ").await.unwrap_err();
    assert_eq!(
        blank.validation_errors().unwrap()[0].message,
        "Comment text is required"
    );
}

#[tokio::test]
async fn test_fetch_analytics() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/analytics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalTasks": 4,
            "toDo": 1,
            "inProgress": 1,
            "done": 2
        })))
        .mount(&ctx.server)
        .await;

    let analytics = ctx.client.fetch_analytics().await.unwrap();

    assert_eq!(analytics.total_tasks, 4);
    assert_eq!(analytics.completion_rate(), 50.0);
    assert_eq!(analytics.in_progress_rate(), 25.0);
}

#[tokio::test]
async fn test_dropped_view_scope_writes_nothing() {
    let ctx = TestContext::new().await;
    ctx.login_as("alice", "tok-alice").await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([task_json(1, "Late", "TODO")]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&ctx.server)
        .await;

    let mut scope = ViewScope::new("task-list");
    let store = ctx.client.tasks().clone();
    let call = scope.spawn(async move { store.load_all().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    drop(scope);

    assert!(matches!(call.join().await, Err(ClientError::Cancelled)));
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(ctx.client.tasks().is_empty().await);
}
