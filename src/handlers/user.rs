use bcrypt::{hash, verify, DEFAULT_COST};
use crate::dtos::user::{
    RegisterUserRequest, UserResponse, LoginRequest, LoginResponse, UpdateProfileRequest,
};
use crate::auth::jwt::{sign_token, TOKEN_TTL_HOURS};
use crate::error::AppError;
use crate::models::user::{User, REGISTERABLE_ROLES};
use axum::{extract::State, Json};
use crate::state::AppState;
use crate::middleware::auth::AuthContext;
use axum::extract::Extension;

const USER_COLUMNS: &str =
    "id, email, password_hash, full_name, role, region, language, phone, avatar_url, status, created_at";

// POST /auth/register - Create a farmer or buyer account
pub async fn register_user(
    State(AppState { db_pool }): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(axum::http::StatusCode, Json<UserResponse>), AppError> {
    // Basic validation
    if !REGISTERABLE_ROLES.contains(&payload.role.as_str()) {
        return Err(AppError::validation("Invalid role"));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(AppError::validation("Valid email required"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation("Password too short"));
    }
    if payload.full_name.trim().is_empty() {
        return Err(AppError::validation("Full name required"));
    }
    if payload.region.trim().is_empty() {
        return Err(AppError::validation("Region required"));
    }

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, password_hash, full_name, role, region, language, phone)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.full_name)
    .bind(&payload.role)
    .bind(&payload.region)
    .bind(payload.language.as_deref().unwrap_or("en"))
    .bind(&payload.phone)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db_err) = e.as_database_error() {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::conflict("Email already registered");
            }
        }
        AppError::db(e)
    })?;

    Ok((axum::http::StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn login_user(
    State(AppState { db_pool }): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::validation("Email required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(&payload.email)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if user.status == "suspended" {
        return Err(AppError::forbidden("Account suspended"));
    }

    let ok = verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;

    if !ok {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::internal("JWT secret not configured"))?;

    let token = sign_token(user.id, &user.role, &user.email, &secret)?;

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in_seconds: (TOKEN_TTL_HOURS * 60 * 60) as usize,
    }))
}

// Authenticated endpoint: returns full user profile from DB using the id in AuthContext
pub async fn get_me(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(auth.user_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}

// PUT /auth/me - Partial profile update, absent fields keep their value
pub async fn update_me(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if let Some(name) = &payload.full_name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Full name cannot be empty"));
        }
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET
         full_name = COALESCE($2, full_name),
         region = COALESCE($3, region),
         language = COALESCE($4, language),
         phone = COALESCE($5, phone),
         avatar_url = COALESCE($6, avatar_url)
         WHERE id = $1
         RETURNING {USER_COLUMNS}"
    ))
    .bind(auth.user_id)
    .bind(payload.full_name)
    .bind(payload.region)
    .bind(payload.language)
    .bind(payload.phone)
    .bind(payload.avatar_url)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}
