/// Ownership resolver for boards, columns, and tasks
///
/// Every board belongs to exactly one user, columns belong to a board, and
/// tasks belong to a column (with a denormalized `board_id`). Authorization
/// is therefore a walk up the ownership chain to the owning user:
///
/// ```text
/// Task → Column → Board → owner_user_id
/// ```
///
/// Each entity kind needs a different join depth to reach the owner, so the
/// target is a tagged variant with one lookup query per kind. The resolver
/// is read-only and is invoked fresh on every operation; nothing is cached
/// across requests.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::ownership::{authorize, OwnedEntity};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, board_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let record = authorize(&pool, user_id, OwnedEntity::Board(board_id)).await?;
/// println!("board {} belongs to {}", record.board_id, record.owner_user_id);
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

/// An entity whose ownership chain can be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedEntity {
    /// A board, owned directly
    Board(Uuid),

    /// A column, owned via its board
    Column(Uuid),

    /// A task, owned via its (denormalized) board
    Task(Uuid),
}

/// The resolved ownership chain for an entity
///
/// Carries the ids callers need after the check: the owning board (used to
/// recompute a task's `board_id` on reparenting) and, for tasks, the
/// current column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct OwnershipRecord {
    /// The user who owns the board at the top of the chain
    pub owner_user_id: Uuid,

    /// The board the entity belongs to (the entity itself for boards)
    pub board_id: Uuid,

    /// The task's current column; `None` for board and column targets
    pub column_id: Option<Uuid>,
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    /// The target entity does not exist
    #[error("Entity not found")]
    NotFound,

    /// The requester is not the owner of the target entity
    #[error("Not authorized to access this resource")]
    Forbidden,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Resolves the ownership chain of an entity
///
/// Returns `None` if the entity does not exist. Performs exactly one query
/// per call, joining up to the owning board where needed.
pub async fn resolve(
    pool: &PgPool,
    entity: OwnedEntity,
) -> Result<Option<OwnershipRecord>, sqlx::Error> {
    let record = match entity {
        OwnedEntity::Board(board_id) => {
            sqlx::query_as::<_, OwnershipRecord>(
                r#"
                SELECT owner_user_id, board_id, NULL::uuid AS column_id
                FROM boards
                WHERE board_id = $1
                "#,
            )
            .bind(board_id)
            .fetch_optional(pool)
            .await?
        }
        OwnedEntity::Column(column_id) => {
            sqlx::query_as::<_, OwnershipRecord>(
                r#"
                SELECT b.owner_user_id, c.board_id, NULL::uuid AS column_id
                FROM columns c
                JOIN boards b ON c.board_id = b.board_id
                WHERE c.column_id = $1
                "#,
            )
            .bind(column_id)
            .fetch_optional(pool)
            .await?
        }
        OwnedEntity::Task(task_id) => {
            // The task's denormalized board_id is trusted here; it is kept
            // in sync whenever the task is reparented.
            sqlx::query_as::<_, OwnershipRecord>(
                r#"
                SELECT b.owner_user_id, t.board_id, t.column_id
                FROM tasks t
                JOIN boards b ON t.board_id = b.board_id
                WHERE t.task_id = $1
                "#,
            )
            .bind(task_id)
            .fetch_optional(pool)
            .await?
        }
    };

    Ok(record)
}

/// Resolves an entity's ownership chain and checks it against a requester
///
/// Returns the ownership record on success. A missing entity yields
/// `NotFound` and a mismatched owner yields `Forbidden`; the two are never
/// collapsed (404 vs 403 stay distinguishable at the API surface).
pub async fn authorize(
    pool: &PgPool,
    requester_id: Uuid,
    entity: OwnedEntity,
) -> Result<OwnershipRecord, OwnershipError> {
    let record = resolve(pool, entity)
        .await?
        .ok_or(OwnershipError::NotFound)?;

    if record.owner_user_id != requester_id {
        return Err(OwnershipError::Forbidden);
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_variants_are_distinct() {
        let id = Uuid::new_v4();
        assert_ne!(OwnedEntity::Board(id), OwnedEntity::Column(id));
        assert_ne!(OwnedEntity::Column(id), OwnedEntity::Task(id));
    }

    #[test]
    fn test_error_messages_do_not_leak_ids() {
        let not_found = OwnershipError::NotFound.to_string();
        let forbidden = OwnershipError::Forbidden.to_string();

        assert_eq!(not_found, "Entity not found");
        assert_eq!(forbidden, "Not authorized to access this resource");
    }

    // Database-backed authorization tests live in
    // taskboard-api/tests/api_tests.rs where a migrated pool is available.
}
