use axum::{extract::State, Json};
use crate::dtos::farm::{UpsertFarmRequest, FarmResponse};
use crate::models::farm::Farm;
use crate::state::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use axum::extract::Extension;

const FARM_COLUMNS: &str =
    "id, user_id, name, size_ha::FLOAT8 AS size_ha, primary_crops, created_at";

// GET /farm - The calling farmer's farm profile
pub async fn get_farm(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<FarmResponse>, AppError> {
    if auth.role != "farmer" {
        return Err(AppError::forbidden("Only farmers have farm profiles"));
    }

    let farm = sqlx::query_as::<_, Farm>(&format!(
        "SELECT {FARM_COLUMNS} FROM farms WHERE user_id = $1"
    ))
    .bind(auth.user_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("No farm profile found"))?;

    Ok(Json(FarmResponse::from(farm)))
}

// PUT /farm - Create or replace the calling farmer's farm profile
pub async fn upsert_farm(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpsertFarmRequest>,
) -> Result<Json<FarmResponse>, AppError> {
    if auth.role != "farmer" {
        return Err(AppError::forbidden("Only farmers have farm profiles"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Farm name required"));
    }
    if let Some(size_ha) = payload.size_ha {
        if size_ha <= 0.0 {
            return Err(AppError::validation("Farm size must be greater than 0"));
        }
    }

    let farm = sqlx::query_as::<_, Farm>(&format!(
        "INSERT INTO farms (user_id, name, size_ha, primary_crops)
         VALUES ($1, $2, $3::FLOAT8, $4)
         ON CONFLICT (user_id) DO UPDATE SET
             name = EXCLUDED.name,
             size_ha = EXCLUDED.size_ha,
             primary_crops = EXCLUDED.primary_crops
         RETURNING {FARM_COLUMNS}"
    ))
    .bind(auth.user_id)
    .bind(&payload.name)
    .bind(payload.size_ha)
    .bind(payload.primary_crops.unwrap_or_default())
    .fetch_one(&db_pool)
    .await?;

    Ok(Json(FarmResponse::from(farm)))
}
