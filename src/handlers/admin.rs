use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use crate::dtos::user::{UserResponse, UpdateUserStatusRequest};
use crate::models::user::User;
use crate::state::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use axum::extract::Extension;

const USER_COLUMNS: &str =
    "id, email, password_hash, full_name, role, region, language, phone, avatar_url, status, created_at";

// GET /admin/users - Every account, newest first
pub async fn get_users(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    if auth.role != "admin" {
        return Err(AppError::forbidden("Only admins can list users"));
    }

    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
    ))
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// PUT /admin/users/{id}/status - Suspend or reactivate an account
pub async fn set_user_status(
    Path(id): Path<Uuid>,
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if auth.role != "admin" {
        return Err(AppError::forbidden("Only admins can change account status"));
    }
    if payload.status != "active" && payload.status != "suspended" {
        return Err(AppError::validation("Invalid status"));
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET status = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(id)
    .bind(&payload.status)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}
