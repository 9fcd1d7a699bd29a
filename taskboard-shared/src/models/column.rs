/// Column model and database operations
///
/// A column belongs to exactly one board, fixed at creation; columns are
/// never moved to a different board. `column_order` is a board-scoped
/// integer: new columns are appended at `max(column_order) + 1` (0 on an
/// empty board) and clients may rewrite it freely on update. Uniqueness of
/// the order within a board is a soft invariant; concurrent inserts can
/// produce duplicates (see [`Column::next_order`]).
///
/// Deleting a column that still has tasks fails with a foreign key
/// violation, surfaced by the API as a conflict.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE columns (
///     column_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     board_id UUID NOT NULL REFERENCES boards (board_id),
///     title VARCHAR(255) NOT NULL,
///     column_order INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Column model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Column {
    /// Unique column ID (UUID v4)
    pub column_id: Uuid,

    /// The board this column belongs to (immutable)
    pub board_id: Uuid,

    /// Column title
    pub title: String,

    /// Board-scoped position, ascending
    pub column_order: i32,

    /// When the column was created
    pub created_at: DateTime<Utc>,

    /// When the column was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new column
#[derive(Debug, Clone)]
pub struct CreateColumn {
    /// Parent board
    pub board_id: Uuid,

    /// Column title (required, non-empty)
    pub title: String,

    /// Position within the board (computed via [`Column::next_order`])
    pub column_order: i32,
}

/// Input for updating an existing column
///
/// Only fields that are `Some` are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateColumn {
    /// New title
    pub title: Option<String>,

    /// New position (accepted as supplied; siblings are not renumbered)
    pub column_order: Option<i32>,
}

impl UpdateColumn {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.column_order.is_none()
    }
}

impl Column {
    /// Computes the order value for a column appended to a board
    ///
    /// `max(column_order) + 1`, or 0 when the board has no columns. Two
    /// concurrent creates under the same board can both observe the same
    /// maximum and insert duplicate order values; the API accepts that
    /// rather than serializing inserts.
    pub async fn next_order(pool: &PgPool, board_id: Uuid) -> Result<i32, sqlx::Error> {
        let (next,): (i32,) = sqlx::query_as(
            r#"
            SELECT COALESCE(MAX(column_order) + 1, 0)
            FROM columns
            WHERE board_id = $1
            "#,
        )
        .bind(board_id)
        .fetch_one(pool)
        .await?;

        Ok(next)
    }

    /// Creates a new column on a board
    pub async fn create(pool: &PgPool, data: CreateColumn) -> Result<Self, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO columns (board_id, title, column_order)
            VALUES ($1, $2, $3)
            RETURNING column_id, board_id, title, column_order, created_at, updated_at
            "#,
        )
        .bind(data.board_id)
        .bind(data.title)
        .bind(data.column_order)
        .fetch_one(pool)
        .await?;

        Ok(column)
    }

    /// Lists a board's columns ordered by position
    pub async fn list_by_board(pool: &PgPool, board_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let columns = sqlx::query_as::<_, Column>(
            r#"
            SELECT column_id, board_id, title, column_order, created_at, updated_at
            FROM columns
            WHERE board_id = $1
            ORDER BY column_order ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(columns)
    }

    /// Updates a column, writing only the fields present in `data`
    ///
    /// Stamps `updated_at`. Returns `None` if the column no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateColumn,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE columns SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.column_order.is_some() {
            bind_count += 1;
            query.push_str(&format!(", column_order = ${}", bind_count));
        }

        query.push_str(
            " WHERE column_id = $1 RETURNING column_id, board_id, title, column_order, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Column>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(order) = data.column_order {
            q = q.bind(order);
        }

        let column = q.fetch_optional(pool).await?;

        Ok(column)
    }

    /// Deletes a column by ID
    ///
    /// Returns `true` if a row was deleted. Fails with a foreign key
    /// violation if the column still has tasks.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE column_id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
