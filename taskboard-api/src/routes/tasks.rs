/// Task endpoints
///
/// # Endpoints
///
/// - `POST   /api/columns/:column_id/tasks` - Create a task at the end of the column
/// - `GET    /api/columns/:column_id/tasks` - List a column's tasks by position
/// - `PUT    /api/tasks/:task_id` - Partial update, including reparenting
/// - `DELETE /api/tasks/:task_id` - Delete
///
/// Reparenting: when the update payload carries a `column_id` that differs
/// from the task's current column, the *target* column's ownership chain is
/// authorized as well (it may sit on a different board of the same owner)
/// and the task's denormalized `board_id` is recomputed from it. Any
/// client-supplied `task_order` is applied as-is; siblings left behind or
/// displaced are not renumbered.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::present,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskboard_shared::{
    auth::{
        middleware::AuthContext,
        ownership::{authorize, OwnedEntity},
    },
    models::task::{CreateTask, Task, UpdateTask},
};
use uuid::Uuid;
use validator::Validate;

use super::boards::DeleteResponse;

/// Create-task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title (required, non-empty)
    #[validate(length(min = 1, message = "The task title is required."))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional priority label
    pub priority: Option<String>,
}

/// Update-task request
///
/// Field-presence-driven: absent keys leave the column untouched; `null`
/// clears the nullable fields. `board_id` is deliberately not accepted,
/// it is derived from `column_id`.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,

    /// New description; `null` clears it
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,

    /// New column-scoped position (applied as supplied)
    pub task_order: Option<i32>,

    /// Target column (reparenting)
    pub column_id: Option<Uuid>,

    /// New due date; `null` clears it
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New priority; `null` clears it
    #[serde(default, deserialize_with = "present")]
    pub priority: Option<Option<String>>,

    /// New assignee; `null` clears it
    #[serde(default, deserialize_with = "present")]
    pub assigned_user_id: Option<Option<Uuid>>,
}

/// Create a task appended at the end of a column
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(column_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    // The column's ownership record carries the board id the task is
    // denormalized onto
    let parent = authorize(&state.db, auth.user_id, OwnedEntity::Column(column_id)).await?;

    let task_order = Task::next_order(&state.db, column_id).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            column_id,
            board_id: parent.board_id,
            title: req.title,
            description: req.description,
            task_order,
            creator_user_id: auth.user_id,
            due_date: req.due_date,
            priority: req.priority,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List a column's tasks ordered by position
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(column_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    authorize(&state.db, auth.user_id, OwnedEntity::Column(column_id)).await?;

    let tasks = Task::list_by_column(&state.db, column_id).await?;

    Ok(Json(tasks))
}

/// Partially update a task, reparenting it if `column_id` changes
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let mut data = UpdateTask {
        title: req.title,
        description: req.description,
        task_order: req.task_order,
        column_id: req.column_id,
        board_id: None,
        due_date: req.due_date,
        priority: req.priority,
        assigned_user_id: req.assigned_user_id,
    };

    if data.is_empty() {
        return Err(ApiError::BadRequest(
            "Provide at least one field to update.".to_string(),
        ));
    }

    // Authorize against the task's current owning chain first: a missing
    // task is 404 before any ownership verdict
    let current = authorize(&state.db, auth.user_id, OwnedEntity::Task(task_id)).await?;

    // Reparenting: the target column must also belong to the requester,
    // and the denormalized board_id follows the target column's board
    if let Some(target_column_id) = data.column_id {
        if Some(target_column_id) != current.column_id {
            let target = authorize(
                &state.db,
                auth.user_id,
                OwnedEntity::Column(target_column_id),
            )
            .await
            .map_err(|e| match ApiError::from(e) {
                ApiError::NotFound(_) => {
                    ApiError::NotFound("Target column not found.".to_string())
                }
                ApiError::Forbidden(_) => ApiError::Forbidden(
                    "You do not have permission to move tasks to the target column.".to_string(),
                ),
                other => other,
            })?;

            if target.board_id != current.board_id {
                data.board_id = Some(target.board_id);
            }
        }
    }

    let task = Task::update(&state.db, task_id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found.".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    authorize(&state.db, auth.user_id, OwnedEntity::Task(task_id)).await?;

    let deleted = Task::delete(&state.db, task_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found.".to_string()));
    }

    Ok(Json(DeleteResponse {
        message: "Task deleted successfully.".to_string(),
        id: task_id,
    }))
}
