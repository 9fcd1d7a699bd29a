/// Integration tests for the taskboard API
///
/// These run against the database in `DATABASE_URL` (migrated on startup)
/// and drive the full router, covering:
/// - registration / login / token gating
/// - ownership authorization at board, column, and task level (403 vs 404)
/// - order assignment on insert and permissive client reordering
/// - partial updates and reparenting
/// - delete protection while children exist

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health_check_is_public() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_register_login_and_board_flow() {
    let ctx = TestContext::new().await.unwrap();

    let (user_id, token) = ctx.register_user("alice").await;

    // Create a board; the creator becomes the owner
    let (status, board) = ctx
        .request(
            "POST",
            "/api/boards",
            Some(&token),
            Some(json!({ "name": "Sprint" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(board["name"], "Sprint");
    assert_eq!(board["owner_user_id"], user_id.to_string());
    let board_id: Uuid = board["board_id"].as_str().unwrap().parse().unwrap();

    // First column lands at order 0, second at order 1
    let (_, order) = ctx.create_column(&token, board_id, "Todo").await;
    assert_eq!(order, 0);
    let (_, order) = ctx.create_column(&token, board_id, "Doing").await;
    assert_eq!(order, 1);

    // Listing returns them position-ascending
    let (status, columns) = ctx
        .request(
            "GET",
            &format!("/api/boards/{}/columns", board_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let columns = columns.as_array().unwrap();
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0]["title"], "Todo");
    assert_eq!(columns[1]["title"], "Doing");
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let ctx = TestContext::new().await.unwrap();

    let suffix = Uuid::new_v4().simple().to_string();
    let payload = json!({
        "username": format!("dup-{}", suffix),
        "email": format!("dup-{}@example.com", suffix),
        "password": "pw123456"
    });

    let (status, _) = ctx
        .request("POST", "/api/users/register", None, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = ctx
        .request("POST", "/api/users/register", None, Some(payload))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_missing_fields_is_bad_request() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            "/api/users/register",
            None,
            Some(json!({ "username": "", "email": "a@x.com", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let ctx = TestContext::new().await.unwrap();

    let suffix = Uuid::new_v4().simple().to_string();
    let email = format!("wp-{}@example.com", suffix);
    ctx.request(
        "POST",
        "/api/users/register",
        None,
        Some(json!({
            "username": format!("wp-{}", suffix),
            "email": email,
            "password": "pw123456"
        })),
    )
    .await;

    let (status, _) = ctx
        .request(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": email, "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown email answers the same status
    let (status, _) = ctx
        .request(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "pw123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.request("GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request("GET", "/api/users/me", Some("garbage.token.here"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (user_id, token) = ctx.register_user("me").await;
    let (status, body) = ctx.request("GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user_id.to_string());
}

#[tokio::test]
async fn test_foreign_board_is_forbidden_not_missing() {
    let ctx = TestContext::new().await.unwrap();

    let (_, owner_token) = ctx.register_user("owner").await;
    let (_, intruder_token) = ctx.register_user("intruder").await;

    let board_id = ctx.create_board(&owner_token, "Private").await;

    // A valid id with the wrong owner is 403, never 404
    let (status, _) = ctx
        .request(
            "GET",
            &format!("/api/boards/{}", board_id),
            Some(&intruder_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/boards/{}", board_id),
            Some(&intruder_token),
            Some(json!({ "name": "Mine now" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/api/boards/{}", board_id),
            Some(&intruder_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner still sees it untouched
    let (status, body) = ctx
        .request(
            "GET",
            &format!("/api/boards/{}", board_id),
            Some(&owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Private");
}

#[tokio::test]
async fn test_unknown_board_is_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.register_user("nf").await;

    let (status, _) = ctx
        .request(
            "GET",
            &format!("/api/boards/{}", Uuid::new_v4()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_order_sequence() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.register_user("seq").await;

    let board_id = ctx.create_board(&token, "Orders").await;
    let (column_id, _) = ctx.create_column(&token, board_id, "Todo").await;

    // Tasks append at 0, 1, 2; with orders {0,1,2} the next lands at 3
    for expected in 0..3 {
        let task = ctx.create_task(&token, column_id, "t").await;
        assert_eq!(task["task_order"].as_i64().unwrap(), expected);
    }
    let task = ctx.create_task(&token, column_id, "t").await;
    assert_eq!(task["task_order"].as_i64().unwrap(), 3);
}

#[tokio::test]
async fn test_partial_task_update() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.register_user("part").await;

    let board_id = ctx.create_board(&token, "Partial").await;
    let (column_id, _) = ctx.create_column(&token, board_id, "Todo").await;
    let task = ctx.create_task(&token, column_id, "Write tests").await;
    let task_id = task["task_id"].as_str().unwrap();

    // Updating only the description leaves everything else alone
    let (status, updated) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&token),
            Some(json!({ "description": "now with details" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "now with details");
    assert_eq!(updated["title"], "Write tests");
    assert_eq!(updated["task_order"], task["task_order"]);
    assert_eq!(updated["column_id"], task["column_id"]);
    assert_eq!(updated["board_id"], task["board_id"]);

    // Explicit null clears the field
    let (status, cleared) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&token),
            Some(json!({ "description": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["description"].is_null());

    // An empty payload is rejected
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_client_supplied_order_is_applied_as_is() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.register_user("raw").await;

    let board_id = ctx.create_board(&token, "Raw").await;
    let (column_id, _) = ctx.create_column(&token, board_id, "Todo").await;
    let task = ctx.create_task(&token, column_id, "t").await;

    // Any integer is accepted, including gaps and negatives
    let (status, updated) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task["task_id"].as_str().unwrap()),
            Some(&token),
            Some(json!({ "task_order": -7 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["task_order"].as_i64().unwrap(), -7);
}

#[tokio::test]
async fn test_reparent_task_within_own_boards() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.register_user("move").await;

    let board_a = ctx.create_board(&token, "A").await;
    let board_b = ctx.create_board(&token, "B").await;
    let (col_a, _) = ctx.create_column(&token, board_a, "Todo").await;
    let (col_b, _) = ctx.create_column(&token, board_b, "Done").await;

    let task = ctx.create_task(&token, col_a, "migrate me").await;
    let task_id = task["task_id"].as_str().unwrap();

    // Moving to a column on another owned board recomputes board_id
    let (status, moved) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&token),
            Some(json!({ "column_id": col_b, "task_order": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["column_id"], col_b.to_string());
    assert_eq!(moved["board_id"], board_b.to_string());
}

#[tokio::test]
async fn test_reparent_to_foreign_column_is_forbidden() {
    let ctx = TestContext::new().await.unwrap();
    let (_, owner_token) = ctx.register_user("rp-owner").await;
    let (_, other_token) = ctx.register_user("rp-other").await;

    let board = ctx.create_board(&owner_token, "Mine").await;
    let (column, _) = ctx.create_column(&owner_token, board, "Todo").await;
    let task = ctx.create_task(&owner_token, column, "stay put").await;
    let task_id = task["task_id"].as_str().unwrap();

    let foreign_board = ctx.create_board(&other_token, "Theirs").await;
    let (foreign_column, _) = ctx
        .create_column(&other_token, foreign_board, "Todo")
        .await;

    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&owner_token),
            Some(json!({ "column_id": foreign_column })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The task is untouched
    let (_, tasks) = ctx
        .request(
            "GET",
            &format!("/api/columns/{}/tasks", column),
            Some(&owner_token),
            None,
        )
        .await;
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["column_id"], column.to_string());
    assert_eq!(tasks[0]["board_id"], board.to_string());
}

#[tokio::test]
async fn test_delete_board_blocked_while_columns_exist() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.register_user("del").await;

    let board_id = ctx.create_board(&token, "Doomed").await;
    let (column_id, _) = ctx.create_column(&token, board_id, "Todo").await;

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/api/boards/{}", board_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Remove the column, then the board delete succeeds
    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/api/columns/{}", column_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .request(
            "DELETE",
            &format!("/api/boards/{}", board_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], board_id.to_string());

    // Gone for good
    let (status, _) = ctx
        .request(
            "GET",
            &format!("/api/boards/{}", board_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_column_blocked_while_tasks_exist() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.register_user("delc").await;

    let board_id = ctx.create_board(&token, "B").await;
    let (column_id, _) = ctx.create_column(&token, board_id, "Todo").await;
    let task = ctx.create_task(&token, column_id, "blocker").await;

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/api/columns/{}", column_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/api/tasks/{}", task["task_id"].as_str().unwrap()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/api/columns/{}", column_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_with_empty_payload_is_bad_request() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.register_user("empty").await;

    let board_id = ctx.create_board(&token, "B").await;
    let (column_id, _) = ctx.create_column(&token, board_id, "Todo").await;

    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/boards/{}", board_id),
            Some(&token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/columns/{}", column_id),
            Some(&token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_board_list_only_shows_own_boards() {
    let ctx = TestContext::new().await.unwrap();
    let (_, alice_token) = ctx.register_user("list-a").await;
    let (_, bob_token) = ctx.register_user("list-b").await;

    let alice_board = ctx.create_board(&alice_token, "Alice's").await;
    ctx.create_board(&bob_token, "Bob's").await;

    let (status, boards) = ctx.request("GET", "/api/boards", Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let boards = boards.as_array().unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0]["board_id"], alice_board.to_string());
}
