/// Board model and database operations
///
/// A board belongs to exactly one user (its creator; ownership never
/// transfers) and contains ordered columns. Boards cannot be deleted while
/// they still have columns: the foreign key has no cascade, so the delete
/// fails and the API reports a conflict.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     board_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_user_id UUID NOT NULL REFERENCES users (user_id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Board model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID (UUID v4)
    pub board_id: Uuid,

    /// Board name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// The user who owns this board
    pub owner_user_id: Uuid,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new board
#[derive(Debug, Clone)]
pub struct CreateBoard {
    /// Board name (required, non-empty)
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owner (the authenticated creator)
    pub owner_user_id: Uuid,
}

/// Input for updating an existing board
///
/// Only fields that are `Some` are written. The double option on
/// `description` distinguishes "leave untouched" (`None`) from "set to
/// NULL" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdateBoard {
    /// New name
    pub name: Option<String>,

    /// New description (use `Some(None)` to clear)
    pub description: Option<Option<String>>,
}

impl UpdateBoard {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

impl Board {
    /// Creates a new board owned by the given user
    pub async fn create(pool: &PgPool, data: CreateBoard) -> Result<Self, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (name, description, owner_user_id)
            VALUES ($1, $2, $3)
            RETURNING board_id, name, description, owner_user_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_user_id)
        .fetch_one(pool)
        .await?;

        Ok(board)
    }

    /// Finds a board by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT board_id, name, description, owner_user_id, created_at, updated_at
            FROM boards
            WHERE board_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Lists a user's boards, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let boards = sqlx::query_as::<_, Board>(
            r#"
            SELECT board_id, name, description, owner_user_id, created_at, updated_at
            FROM boards
            WHERE owner_user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_user_id)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }

    /// Updates a board, writing only the fields present in `data`
    ///
    /// Stamps `updated_at`. Returns `None` if the board no longer exists
    /// (deleted between the ownership check and this statement).
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBoard,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET clause dynamically from the present fields
        let mut query = String::from("UPDATE boards SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE board_id = $1 RETURNING board_id, name, description, owner_user_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Board>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let board = q.fetch_optional(pool).await?;

        Ok(board)
    }

    /// Deletes a board by ID
    ///
    /// Returns `true` if a row was deleted. Fails with a foreign key
    /// violation if the board still has columns.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE board_id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
