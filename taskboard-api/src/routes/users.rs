/// User endpoints: registration, login, current user
///
/// # Endpoints
///
/// - `POST /api/users/register` - Register a new account
/// - `POST /api/users/login` - Authenticate and receive a 1-hour JWT
/// - `GET  /api/users/me` - The authenticated user's identity (auth required)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, User},
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username
    #[validate(length(min = 1, message = "Please provide a username, email and password."))]
    pub username: String,

    /// Email address
    #[validate(length(min = 1, message = "Please provide a username, email and password."))]
    pub email: String,

    /// Password (stored as an Argon2id hash)
    #[validate(length(min = 1, message = "Please provide a username, email and password."))]
    pub password: String,
}

/// The registered account, without the credential hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub user_id: Uuid,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Confirmation message
    pub message: String,

    /// The created account
    pub user: UserResponse,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(length(min = 1, message = "Please provide an email and password."))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Please provide an email and password."))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Confirmation message
    pub message: String,

    /// Bearer token, valid for 1 hour
    pub token: String,

    /// Authenticated user ID
    pub user_id: Uuid,

    /// Authenticated username
    pub username: String,
}

/// Current-user response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Authenticated username
    pub username: String,
}

/// Register a new user
///
/// # Errors
///
/// - `400 Bad Request`: missing username, email, or password
/// - `409 Conflict`: username or email already registered
/// - `500 Internal Server Error`: hashing or persistence failure
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    // Pre-check duplication for a friendly 409; the unique constraints
    // remain as the backstop against a concurrent register
    if User::exists(&state.db, &req.username, &req.email).await? {
        return Err(ApiError::Conflict(
            "Email or username already registered.".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully.".to_string(),
            user: UserResponse {
                user_id: user.user_id,
                username: user.username,
                email: user.email,
                created_at: user.created_at,
            },
        }),
    ))
}

/// Login and receive a bearer token
///
/// Unknown email and wrong password both answer the same 401 so the
/// response does not reveal which accounts exist.
///
/// # Errors
///
/// - `400 Bad Request`: missing email or password
/// - `401 Unauthorized`: invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials.".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials.".to_string()));
    }

    let claims = jwt::Claims::new(user.user_id, user.username.clone());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        message: "Login successful.".to_string(),
        token,
        user_id: user.user_id,
        username: user.username,
    }))
}

/// The authenticated user's identity, straight from the token claims
pub async fn me(Extension(auth): Extension<AuthContext>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: auth.user_id,
        username: auth.username,
    })
}
