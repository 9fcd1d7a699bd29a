/// Common test utilities for integration tests
///
/// Provides a `TestContext` that wires a real (migrated) Postgres database
/// to the application router, plus helpers for driving the router and for
/// registering throwaway users.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use tower::ServiceExt as _;
use uuid::Uuid;

/// Test context containing the database pool and the router under test
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context against the database in `DATABASE_URL`
    pub async fn new() -> anyhow::Result<Self> {
        // The API refuses to start without a JWT secret; give the test run
        // a deterministic one when the environment does not provide it
        if std::env::var("JWT_SECRET").is_err() {
            std::env::set_var(
                "JWT_SECRET",
                "integration-test-secret-0123456789abcdef",
            );
        }

        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to the crate's Cargo.toml
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Sends a request to the router and returns (status, parsed JSON body)
    ///
    /// The body value is `Value::Null` when the response body is empty.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Registers a fresh user and logs in, returning (user_id, token)
    ///
    /// Usernames and emails are suffixed with a UUID so tests never collide.
    pub async fn register_user(&self, prefix: &str) -> (Uuid, String) {
        let suffix = Uuid::new_v4().simple().to_string();
        let username = format!("{}-{}", prefix, suffix);
        let email = format!("{}-{}@example.com", prefix, suffix);

        let (status, body) = self
            .request(
                "POST",
                "/api/users/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": "pw123456"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let (status, body) = self
            .request(
                "POST",
                "/api/users/login",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "password": "pw123456"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        let user_id: Uuid = body["user_id"].as_str().unwrap().parse().unwrap();
        let token = body["token"].as_str().unwrap().to_string();

        (user_id, token)
    }

    /// Creates a board for the given token, returning its id
    pub async fn create_board(&self, token: &str, name: &str) -> Uuid {
        let (status, body) = self
            .request(
                "POST",
                "/api/boards",
                Some(token),
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create board failed: {}", body);

        body["board_id"].as_str().unwrap().parse().unwrap()
    }

    /// Creates a column on a board, returning (column_id, column_order)
    pub async fn create_column(&self, token: &str, board_id: Uuid, title: &str) -> (Uuid, i64) {
        let (status, body) = self
            .request(
                "POST",
                &format!("/api/boards/{}/columns", board_id),
                Some(token),
                Some(serde_json::json!({ "title": title })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create column failed: {}", body);

        (
            body["column_id"].as_str().unwrap().parse().unwrap(),
            body["column_order"].as_i64().unwrap(),
        )
    }

    /// Creates a task in a column, returning its JSON body
    pub async fn create_task(&self, token: &str, column_id: Uuid, title: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                &format!("/api/columns/{}/tasks", column_id),
                Some(token),
                Some(serde_json::json!({ "title": title })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);

        body
    }
}
