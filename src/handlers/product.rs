// src/handlers/product.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;
use uuid::Uuid;
use crate::dtos::bid::ProductBidItem;
use crate::dtos::product::{
    CreateProductRequest, UpdateProductRequest, SetProductStatusRequest, ProductResponse,
};
use crate::models::product::{Product, ProductStatus};
use crate::state::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use axum::extract::Extension;
use sqlx::PgPool;
use tracing::{error, instrument};

const PRODUCT_COLUMNS: &str =
    "id, farmer_id, title, description, category, qty_kg::FLOAT8 AS qty_kg, unit,
     min_price::FLOAT8 AS min_price, location, harvest_date, organic, photo_url, status, created_at";

const LISTING_COLUMNS: &str =
    "p.id, p.farmer_id, u.full_name AS farmer_name, p.title, p.description, p.category,
     p.qty_kg::FLOAT8 AS qty_kg, p.unit, p.min_price::FLOAT8 AS min_price, p.location,
     p.harvest_date, p.organic, p.photo_url, p.status, p.created_at";

// GET /products - Browse active listings, with optional filters
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let category = params.get("category");
    let location = params.get("location");
    let organic = params.get("organic").and_then(|s| s.parse::<bool>().ok());

    let mut query_str = format!(
        "SELECT {LISTING_COLUMNS}
         FROM products p
         JOIN users u ON p.farmer_id = u.id
         WHERE p.status = 'active'"
    );

    let mut param_num = 0;
    if category.is_some() {
        param_num += 1;
        query_str.push_str(&format!(" AND p.category = ${param_num}"));
    }
    if location.is_some() {
        param_num += 1;
        query_str.push_str(&format!(" AND p.location = ${param_num}"));
    }
    if organic.is_some() {
        param_num += 1;
        query_str.push_str(&format!(" AND p.organic = ${param_num}"));
    }
    query_str.push_str(" ORDER BY p.created_at DESC");

    let mut query = sqlx::query_as::<_, ListingRow>(&query_str);
    if let Some(category) = category {
        query = query.bind(category);
    }
    if let Some(location) = location {
        query = query.bind(location);
    }
    if let Some(organic) = organic {
        query = query.bind(organic);
    }

    match query.fetch_all(&state.db_pool).await {
        Ok(rows) => Ok(Json(rows.into_iter().map(ListingRow::into_response).collect())),
        Err(e) => {
            error!(?e, "Failed to fetch listings");
            Err(e.into())
        }
    }
}

// GET /products/{id} - Get a single listing, whatever its status
#[instrument(skip(state), fields(id))]
pub async fn get_product(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let row = sqlx::query_as::<_, ListingRow>(&format!(
        "SELECT {LISTING_COLUMNS}
         FROM products p
         JOIN users u ON p.farmer_id = u.id
         WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(row.into_response()))
}

// GET /products/mine - The calling farmer's own listings, all statuses
pub async fn get_my_products(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    if auth.role != "farmer" {
        return Err(AppError::forbidden("Only farmers have listings"));
    }

    let rows = sqlx::query_as::<_, ListingRow>(&format!(
        "SELECT {LISTING_COLUMNS}
         FROM products p
         JOIN users u ON p.farmer_id = u.id
         WHERE p.farmer_id = $1
         ORDER BY p.created_at DESC"
    ))
    .bind(auth.user_id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(rows.into_iter().map(ListingRow::into_response).collect()))
}

// POST /products - Create a listing
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    if auth.role != "farmer" {
        return Err(AppError::forbidden("Only farmers can create listings"));
    }
    if payload.title.trim().is_empty() {
        return Err(AppError::validation("Title required"));
    }
    if payload.category.trim().is_empty() {
        return Err(AppError::validation("Category required"));
    }
    if payload.qty_kg <= 0.0 {
        return Err(AppError::validation("Quantity must be greater than 0"));
    }
    if payload.min_price <= 0.0 {
        return Err(AppError::validation("Minimum price must be greater than 0"));
    }

    let farmer_name = fetch_full_name(&state.db_pool, auth.user_id).await?;

    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (farmer_id, title, description, category, qty_kg, unit, min_price,
                               location, harvest_date, organic, photo_url)
         VALUES ($1, $2, $3, $4, $5::FLOAT8, $6, $7::FLOAT8, $8, $9, $10, $11)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(auth.user_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.category)
    .bind(payload.qty_kg)
    .bind(payload.unit.as_deref().unwrap_or("kg"))
    .bind(payload.min_price)
    .bind(&payload.location)
    .bind(payload.harvest_date)
    .bind(payload.organic.unwrap_or(false))
    .bind(&payload.photo_url)
    .fetch_one(&state.db_pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::from_product(product, farmer_name)),
    ))
}

// PUT /products/{id} - Update own listing, absent fields keep their value
#[instrument(skip(state, payload), fields(id))]
pub async fn update_product(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    if auth.role != "farmer" {
        return Err(AppError::forbidden("Only farmers can manage listings"));
    }
    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }
    }
    if let Some(qty_kg) = payload.qty_kg {
        if qty_kg <= 0.0 {
            return Err(AppError::validation("Quantity must be greater than 0"));
        }
    }
    if let Some(min_price) = payload.min_price {
        if min_price <= 0.0 {
            return Err(AppError::validation("Minimum price must be greater than 0"));
        }
    }

    let existing = fetch_product(&state.db_pool, id).await?;
    if existing.farmer_id != auth.user_id {
        return Err(AppError::forbidden("You can only update your own listings"));
    }
    if existing.status == "sold" {
        return Err(AppError::conflict("Sold listings cannot be edited"));
    }

    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products SET
         title = COALESCE($2, title),
         description = COALESCE($3, description),
         category = COALESCE($4, category),
         qty_kg = COALESCE($5::FLOAT8, qty_kg),
         unit = COALESCE($6, unit),
         min_price = COALESCE($7::FLOAT8, min_price),
         location = COALESCE($8, location),
         harvest_date = COALESCE($9, harvest_date),
         organic = COALESCE($10, organic),
         photo_url = COALESCE($11, photo_url)
         WHERE id = $1
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(payload.title)
    .bind(payload.description)
    .bind(payload.category)
    .bind(payload.qty_kg)
    .bind(payload.unit)
    .bind(payload.min_price)
    .bind(payload.location)
    .bind(payload.harvest_date)
    .bind(payload.organic)
    .bind(payload.photo_url)
    .fetch_one(&state.db_pool)
    .await?;

    let farmer_name = fetch_full_name(&state.db_pool, auth.user_id).await?;

    Ok(Json(ProductResponse::from_product(product, farmer_name)))
}

// POST /products/{id}/status - Pause or reactivate own listing
pub async fn set_product_status(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<SetProductStatusRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    if auth.role != "farmer" {
        return Err(AppError::forbidden("Only farmers can manage listings"));
    }
    let target = ProductStatus::parse(&payload.status)
        .ok_or_else(|| AppError::validation("Invalid status"))?;
    if target == ProductStatus::Sold {
        return Err(AppError::validation("Sold is set when a bid is accepted"));
    }

    let existing = fetch_product(&state.db_pool, id).await?;
    if existing.farmer_id != auth.user_id {
        return Err(AppError::forbidden("You can only update your own listings"));
    }
    let current = ProductStatus::parse(&existing.status)
        .ok_or_else(|| AppError::internal("Listing has an unknown status"))?;
    if !current.manual_change_allowed(target) {
        return Err(AppError::conflict("Listing already sold"));
    }

    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products SET status = $2 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(target.as_str())
    .fetch_one(&state.db_pool)
    .await?;

    let farmer_name = fetch_full_name(&state.db_pool, auth.user_id).await?;

    Ok(Json(ProductResponse::from_product(product, farmer_name)))
}

// DELETE /products/{id} - Remove own listing if nobody has bid on it
#[instrument(skip(state), fields(id))]
pub async fn delete_product(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    if auth.role != "farmer" {
        return Err(AppError::forbidden("Only farmers can manage listings"));
    }

    let existing = fetch_product(&state.db_pool, id).await?;
    if existing.farmer_id != auth.user_id {
        return Err(AppError::forbidden("You can only delete your own listings"));
    }

    let has_bids = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM bids WHERE product_id = $1)"
    )
    .bind(id)
    .fetch_one(&state.db_pool)
    .await?;

    if has_bids {
        return Err(AppError::conflict("Listing has bids and cannot be deleted"));
    }

    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /products/{id}/bids - Bids on own listing, newest first
pub async fn get_product_bids(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ProductBidItem>>, AppError> {
    let product = fetch_product(&state.db_pool, id).await?;
    if product.farmer_id != auth.user_id {
        return Err(AppError::forbidden("You can only view bids on your own listings"));
    }

    let bids = sqlx::query_as::<_, (Uuid, Uuid, String, f64, f64, String, chrono::DateTime<chrono::Utc>)>(
        "SELECT b.id, b.buyer_id, u.full_name, b.price::FLOAT8, b.qty_kg::FLOAT8, b.status, b.created_at
         FROM bids b
         JOIN users u ON b.buyer_id = u.id
         WHERE b.product_id = $1
         ORDER BY b.created_at DESC"
    )
    .bind(id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(
        bids.into_iter()
            .map(|(id, buyer_id, buyer_name, price, qty_kg, status, created_at)| ProductBidItem {
                id,
                buyer_id,
                buyer_name,
                price,
                qty_kg,
                status,
                created_at,
            })
            .collect(),
    ))
}

async fn fetch_product(db_pool: &PgPool, id: Uuid) -> Result<Product, AppError> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))
}

async fn fetch_full_name(db_pool: &PgPool, user_id: Uuid) -> Result<String, AppError> {
    sqlx::query_scalar::<_, String>("SELECT full_name FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    farmer_id: Uuid,
    farmer_name: String,
    title: String,
    description: Option<String>,
    category: String,
    qty_kg: f64,
    unit: String,
    min_price: f64,
    location: Option<String>,
    harvest_date: Option<chrono::NaiveDate>,
    organic: bool,
    photo_url: Option<String>,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl ListingRow {
    fn into_response(self) -> ProductResponse {
        ProductResponse {
            id: self.id,
            farmer_id: self.farmer_id,
            farmer_name: self.farmer_name,
            title: self.title,
            description: self.description,
            category: self.category,
            qty_kg: self.qty_kg,
            unit: self.unit,
            min_price: self.min_price,
            location: self.location,
            harvest_date: self.harvest_date,
            organic: self.organic,
            photo_url: self.photo_url,
            status: self.status,
            created_at: self.created_at,
        }
    }
}
