use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::users::model::{Role, User, UserSummary};
use crate::modules::users::service::{ReviewService, UserService};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Response for approve/reject, mirroring what review clients consume.
#[derive(Serialize, ToSchema)]
pub struct ReviewResponse {
    pub message: String,
    pub user: ReviewedUser,
}

#[derive(Serialize, ToSchema)]
pub struct ReviewedUser {
    pub id: Uuid,
    pub role: Role,
}

impl ReviewResponse {
    fn new(message: &str, user: &User) -> Self {
        Self {
            message: message.to_string(),
            user: ReviewedUser {
                id: user.id,
                role: user.role,
            },
        }
    }
}

/// Get all users (Admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = Vec<UserSummary>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an Admin", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = UserService::get_users(state.store.as_ref()).await?;
    Ok(Json(users))
}

/// Viewer: request editor access
#[utoipa::path(
    post,
    path = "/api/users/request-editor",
    responses(
        (status = 200, description = "Editor access requested", body = MessageResponse),
        (status = 400, description = "Request already pending", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not a Viewer", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Editor requests"
)]
pub async fn request_editor(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    let caller_id = auth_user.user_id()?;
    ReviewService::request_editor_access(state.store.as_ref(), caller_id).await?;

    Ok(Json(MessageResponse {
        message: "Editor access requested".to_string(),
    }))
}

/// Admin: list pending editor requests
#[utoipa::path(
    get,
    path = "/api/users/editor-requests",
    responses(
        (status = 200, description = "Pending editor requests, oldest first", body = Vec<UserSummary>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an Admin", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Editor requests"
)]
pub async fn list_editor_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let pending = ReviewService::list_pending_requests(state.store.as_ref()).await?;
    Ok(Json(pending))
}

/// Admin: approve an editor request
#[utoipa::path(
    post,
    path = "/api/users/editor-requests/{user_id}/approve",
    params(("user_id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 200, description = "Editor access approved", body = ReviewResponse),
        (status = 400, description = "No pending request for this user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an Admin", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Editor requests"
)]
pub async fn approve_editor_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, AppError> {
    let admin_id = auth_user.user_id()?;
    let user = ReviewService::approve_request(state.store.as_ref(), user_id, admin_id).await?;

    Ok(Json(ReviewResponse::new("Editor access approved", &user)))
}

/// Admin: reject an editor request
#[utoipa::path(
    post,
    path = "/api/users/editor-requests/{user_id}/reject",
    params(("user_id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 200, description = "Editor access rejected", body = ReviewResponse),
        (status = 400, description = "No pending request for this user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an Admin", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Editor requests"
)]
pub async fn reject_editor_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, AppError> {
    let admin_id = auth_user.user_id()?;
    let user = ReviewService::reject_request(state.store.as_ref(), user_id, admin_id).await?;

    Ok(Json(ReviewResponse::new("Editor access rejected", &user)))
}
