/// Board endpoints
///
/// # Endpoints
///
/// - `POST   /api/boards` - Create a board (creator becomes owner)
/// - `GET    /api/boards` - List the authenticated user's boards, newest first
/// - `GET    /api/boards/:board_id` - Fetch one board
/// - `PUT    /api/boards/:board_id` - Partial update (name, description)
/// - `DELETE /api/boards/:board_id` - Delete; 409 while columns remain
///
/// Every operation except create re-walks the ownership chain via the
/// resolver; a missing board is 404 and someone else's board is 403,
/// never collapsed into one status.

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
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{
        middleware::AuthContext,
        ownership::{authorize, OwnedEntity},
    },
    models::board::{Board, CreateBoard, UpdateBoard},
};
use uuid::Uuid;
use validator::Validate;

/// Create-board request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    /// Board name (required, non-empty)
    #[validate(length(min = 1, message = "The board name is required."))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Update-board request
///
/// Field-presence-driven: absent keys leave the column untouched, a `null`
/// description clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateBoardRequest {
    /// New name
    pub name: Option<String>,

    /// New description; `null` clears it
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

/// Delete response: a message plus the deleted id
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Confirmation message
    pub message: String,

    /// The deleted entity's id
    pub id: Uuid,
}

/// Create a board owned by the authenticated user
pub async fn create_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    req.validate()?;

    let board = Board::create(
        &state.db,
        CreateBoard {
            name: req.name,
            description: req.description,
            owner_user_id: auth.user_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(board)))
}

/// List the authenticated user's boards, newest first
pub async fn list_boards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Board>>> {
    let boards = Board::list_by_owner(&state.db, auth.user_id).await?;

    Ok(Json(boards))
}

/// Fetch a single board
pub async fn get_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<Board>> {
    authorize(&state.db, auth.user_id, OwnedEntity::Board(board_id)).await?;

    let board = Board::find_by_id(&state.db, board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found.".to_string()))?;

    Ok(Json(board))
}

/// Partially update a board
pub async fn update_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<UpdateBoardRequest>,
) -> ApiResult<Json<Board>> {
    let data = UpdateBoard {
        name: req.name,
        description: req.description,
    };

    if data.is_empty() {
        return Err(ApiError::BadRequest(
            "Provide at least one field to update.".to_string(),
        ));
    }

    authorize(&state.db, auth.user_id, OwnedEntity::Board(board_id)).await?;

    // Zero rows here means the board vanished between the ownership check
    // and the update
    let board = Board::update(&state.db, board_id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found.".to_string()))?;

    Ok(Json(board))
}

/// Delete a board
///
/// Fails with 409 while the board still has columns; deletion never
/// cascades.
pub async fn delete_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    authorize(&state.db, auth.user_id, OwnedEntity::Board(board_id)).await?;

    let deleted = Board::delete(&state.db, board_id).await.map_err(|e| {
        match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict(
                "Cannot delete the board. It may contain columns. Remove them first.".to_string(),
            ),
            other => other,
        }
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Board not found.".to_string()));
    }

    Ok(Json(DeleteResponse {
        message: "Board deleted successfully.".to_string(),
        id: board_id,
    }))
}
