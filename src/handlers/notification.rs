use axum::{extract::State, Json};
use sqlx::PgPool;
use uuid::Uuid;
use crate::dtos::notification::{NotificationResponse, MarkReadRequest, MarkReadResponse};
use crate::models::notification::{Notification, FEED_LIMIT};
use crate::state::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use axum::extract::Extension;

// GET /notifications - The caller's feed, most recent first
pub async fn get_notifications(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let notifications = sqlx::query_as::<_, Notification>(
        "SELECT id, user_id, type AS kind, payload, read, created_at
         FROM notifications
         WHERE user_id = $1
         ORDER BY created_at DESC
         LIMIT $2"
    )
    .bind(auth.user_id)
    .bind(FEED_LIMIT)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(
        notifications.into_iter().map(NotificationResponse::from).collect(),
    ))
}

// PUT /notifications/read - Mark own entries as read; foreign ids are ignored
pub async fn mark_notifications_read(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<MarkReadRequest>,
) -> Result<Json<MarkReadResponse>, AppError> {
    if payload.notification_ids.is_empty() {
        return Err(AppError::validation("notification_ids required"));
    }

    let result = sqlx::query(
        "UPDATE notifications SET read = TRUE WHERE user_id = $1 AND id = ANY($2)"
    )
    .bind(auth.user_id)
    .bind(&payload.notification_ids)
    .execute(&db_pool)
    .await?;

    Ok(Json(MarkReadResponse {
        updated: result.rows_affected(),
    }))
}

// Writes one feed entry. Callers decide whether a failure is fatal.
pub async fn push_notification(
    db_pool: &PgPool,
    user_id: Uuid,
    kind: &str,
    payload: serde_json::Value,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO notifications (user_id, type, payload) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(kind)
        .bind(payload)
        .execute(db_pool)
        .await?;

    Ok(())
}
