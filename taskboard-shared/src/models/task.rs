/// Task model and database operations
///
/// A task belongs to exactly one column at a time. `column_id` may change
/// (reparenting, including across boards of the same owner), at which point
/// `board_id` is recomputed from the target column; `board_id` is a
/// denormalized convenience field and is never client-settable on its own.
///
/// `task_order` is a column-scoped integer with the same append and
/// soft-uniqueness semantics as `column_order` (see the column model).
/// On reparenting no sibling renumbering happens: the caller supplies
/// whatever `task_order` it wants the task to land at.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     task_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     column_id UUID NOT NULL REFERENCES columns (column_id),
///     board_id UUID NOT NULL REFERENCES boards (board_id),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     task_order INTEGER NOT NULL DEFAULT 0,
///     creator_user_id UUID NOT NULL REFERENCES users (user_id),
///     assigned_user_id UUID REFERENCES users (user_id),
///     due_date TIMESTAMPTZ,
///     priority VARCHAR(50),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub task_id: Uuid,

    /// The column this task currently belongs to
    pub column_id: Uuid,

    /// The board of the current column (denormalized, kept in sync)
    pub board_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Column-scoped position, ascending
    pub task_order: i32,

    /// The user who created the task
    pub creator_user_id: Uuid,

    /// Optional assignee
    pub assigned_user_id: Option<Uuid>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional free-form priority label
    pub priority: Option<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Parent column
    pub column_id: Uuid,

    /// Board of the parent column (derived, not client-supplied)
    pub board_id: Uuid,

    /// Task title (required, non-empty)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Position within the column (computed via [`Task::next_order`])
    pub task_order: i32,

    /// The authenticated creator
    pub creator_user_id: Uuid,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional priority label
    pub priority: Option<String>,
}

/// Input for updating an existing task
///
/// Only fields that are `Some` are written. Double options distinguish
/// "leave untouched" from "set to NULL" for the nullable columns.
/// `board_id` is filled in by the handler when the task is reparented,
/// never from client input.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (use `Some(None)` to clear)
    pub description: Option<Option<String>>,

    /// New position (accepted as supplied; siblings are not renumbered)
    pub task_order: Option<i32>,

    /// Target column (reparenting)
    pub column_id: Option<Uuid>,

    /// Board of the target column, derived when `column_id` changes
    pub board_id: Option<Uuid>,

    /// New due date (use `Some(None)` to clear)
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New priority (use `Some(None)` to clear)
    pub priority: Option<Option<String>>,

    /// New assignee (use `Some(None)` to clear)
    pub assigned_user_id: Option<Option<Uuid>>,
}

impl UpdateTask {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.task_order.is_none()
            && self.column_id.is_none()
            && self.board_id.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.assigned_user_id.is_none()
    }
}

impl Task {
    /// Computes the order value for a task appended to a column
    ///
    /// `max(task_order) + 1`, or 0 when the column is empty. Not atomic
    /// with the subsequent insert; concurrent creates under the same column
    /// can produce duplicate order values.
    pub async fn next_order(pool: &PgPool, column_id: Uuid) -> Result<i32, sqlx::Error> {
        let (next,): (i32,) = sqlx::query_as(
            r#"
            SELECT COALESCE(MAX(task_order) + 1, 0)
            FROM tasks
            WHERE column_id = $1
            "#,
        )
        .bind(column_id)
        .fetch_one(pool)
        .await?;

        Ok(next)
    }

    /// Creates a new task in a column
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks
                (column_id, board_id, title, description, task_order,
                 creator_user_id, due_date, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING task_id, column_id, board_id, title, description, task_order,
                      creator_user_id, assigned_user_id, due_date, priority,
                      created_at, updated_at
            "#,
        )
        .bind(data.column_id)
        .bind(data.board_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.task_order)
        .bind(data.creator_user_id)
        .bind(data.due_date)
        .bind(data.priority)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT task_id, column_id, board_id, title, description, task_order,
                   creator_user_id, assigned_user_id, due_date, priority,
                   created_at, updated_at
            FROM tasks
            WHERE task_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a column's tasks ordered by position
    pub async fn list_by_column(pool: &PgPool, column_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT task_id, column_id, board_id, title, description, task_order,
                   creator_user_id, assigned_user_id, due_date, priority,
                   created_at, updated_at
            FROM tasks
            WHERE column_id = $1
            ORDER BY task_order ASC
            "#,
        )
        .bind(column_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates a task, writing only the fields present in `data`
    ///
    /// Stamps `updated_at`. Returns `None` if the task no longer exists
    /// (deleted between the ownership check and this statement).
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.task_order.is_some() {
            bind_count += 1;
            query.push_str(&format!(", task_order = ${}", bind_count));
        }
        if data.column_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", column_id = ${}", bind_count));
        }
        if data.board_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", board_id = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.assigned_user_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_user_id = ${}", bind_count));
        }

        query.push_str(
            " WHERE task_id = $1 RETURNING task_id, column_id, board_id, title, description, \
             task_order, creator_user_id, assigned_user_id, due_date, priority, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(order) = data.task_order {
            q = q.bind(order);
        }
        if let Some(column_id) = data.column_id {
            q = q.bind(column_id);
        }
        if let Some(board_id) = data.board_id {
            q = q.bind(board_id);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(assignee) = data.assigned_user_id {
            q = q.bind(assignee);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE task_id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
