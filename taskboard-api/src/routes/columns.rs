/// Column endpoints
///
/// # Endpoints
///
/// - `POST   /api/boards/:board_id/columns` - Create a column at the end of the board
/// - `GET    /api/boards/:board_id/columns` - List a board's columns by position
/// - `PUT    /api/columns/:column_id` - Partial update (title, column_order)
/// - `DELETE /api/columns/:column_id` - Delete; 409 while tasks remain
///
/// Columns never move to a different board; only the title and the
/// board-scoped position mutate. Client-supplied `column_order` values are
/// applied as-is, without range or uniqueness validation and without
/// renumbering siblings.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::{
        middleware::AuthContext,
        ownership::{authorize, OwnedEntity},
    },
    models::column::{Column, CreateColumn, UpdateColumn},
};
use uuid::Uuid;
use validator::Validate;

use super::boards::DeleteResponse;

/// Create-column request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateColumnRequest {
    /// Column title (required, non-empty)
    #[validate(length(min = 1, message = "The column title is required."))]
    pub title: String,
}

/// Update-column request
#[derive(Debug, Deserialize)]
pub struct UpdateColumnRequest {
    /// New title
    pub title: Option<String>,

    /// New board-scoped position
    pub column_order: Option<i32>,
}

/// Create a column appended at the end of a board
pub async fn create_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    req.validate()?;

    authorize(&state.db, auth.user_id, OwnedEntity::Board(board_id)).await?;

    // Read max order, then insert: two statements, racy by design
    let column_order = Column::next_order(&state.db, board_id).await?;

    let column = Column::create(
        &state.db,
        CreateColumn {
            board_id,
            title: req.title,
            column_order,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(column)))
}

/// List a board's columns ordered by position
pub async fn list_columns(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Column>>> {
    authorize(&state.db, auth.user_id, OwnedEntity::Board(board_id)).await?;

    let columns = Column::list_by_board(&state.db, board_id).await?;

    Ok(Json(columns))
}

/// Partially update a column
pub async fn update_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(column_id): Path<Uuid>,
    Json(req): Json<UpdateColumnRequest>,
) -> ApiResult<Json<Column>> {
    let data = UpdateColumn {
        title: req.title,
        column_order: req.column_order,
    };

    if data.is_empty() {
        return Err(ApiError::BadRequest(
            "Provide at least one field (title or order) to update.".to_string(),
        ));
    }

    authorize(&state.db, auth.user_id, OwnedEntity::Column(column_id)).await?;

    let column = Column::update(&state.db, column_id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found.".to_string()))?;

    Ok(Json(column))
}

/// Delete a column
///
/// Fails with 409 while the column still has tasks.
pub async fn delete_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(column_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    authorize(&state.db, auth.user_id, OwnedEntity::Column(column_id)).await?;

    let deleted = Column::delete(&state.db, column_id).await.map_err(|e| {
        match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict(
                "Cannot delete the column. It may contain tasks. Remove them first.".to_string(),
            ),
            other => other,
        }
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Column not found.".to_string()));
    }

    Ok(Json(DeleteResponse {
        message: "Column deleted successfully.".to_string(),
        id: column_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_column_requires_title() {
        let req = CreateColumnRequest {
            title: "".to_string(),
        };
        assert!(req.validate().is_err());

        let req = CreateColumnRequest {
            title: "Todo".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_deserialization() {
        let req: UpdateColumnRequest = serde_json::from_str(r#"{"column_order": 5}"#).unwrap();
        assert_eq!(req.column_order, Some(5));
        assert_eq!(req.title, None);

        // Negative order values are accepted as supplied
        let req: UpdateColumnRequest = serde_json::from_str(r#"{"column_order": -3}"#).unwrap();
        assert_eq!(req.column_order, Some(-3));
    }
}
