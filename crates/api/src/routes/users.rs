//! User route handlers.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use repurpose_core::UserId;

use super::{ApiResponse, respond};
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::models::UserProfile;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration payload.
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Login payload.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// Data returned by a successful registration.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    #[serde(rename = "insertedId")]
    pub inserted_id: UserId,
    pub user: UserProfile,
}

/// Data returned by a successful login.
#[derive(Debug, Serialize)]
pub struct LoginSuccess {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: String,
}

/// Data returned by a user lookup.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: UserProfile,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user.
///
/// Responds 201 with the new id and profile. The password hash is never
/// part of the response.
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiResponse<CreatedUser>> {
    let Json(request) = payload?;

    let user = AuthService::new(state.gateway())
        .register(Registration {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role,
        })
        .await?;

    Ok(respond(
        StatusCode::CREATED,
        "Created User Successfully",
        CreatedUser {
            inserted_id: user.id,
            user: UserProfile::from(&user),
        },
    ))
}

/// Log in with email and password.
///
/// Unknown email and wrong password both respond 401 with the same body.
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiResponse<LoginSuccess>> {
    let Json(request) = payload?;

    let user = AuthService::new(state.gateway())
        .login(&request.email, request.password)
        .await?;

    Ok(respond(
        StatusCode::OK,
        "Login Successful",
        LoginSuccess {
            id: user.id,
            email: user.email,
        },
    ))
}

/// Get a user's public profile by id.
pub async fn show(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<ApiResponse<UserBody>> {
    let Path(id) = path?;
    let id = UserId::parse(&id)?;

    let user = UserRepository::new(state.gateway())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no user with id {id}")))?;

    Ok(respond(
        StatusCode::OK,
        "Here is the user",
        UserBody {
            user: UserProfile::from(&user),
        },
    ))
}
