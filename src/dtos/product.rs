// src/dtos/product.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub qty_kg: f64,
    pub unit: Option<String>,
    pub min_price: f64,
    pub location: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub organic: Option<bool>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub qty_kg: Option<f64>,
    pub unit: Option<String>,
    pub min_price: Option<f64>,
    pub location: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub organic: Option<bool>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetProductStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub farmer_name: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub qty_kg: f64,
    pub unit: String,
    pub min_price: f64,
    pub location: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub organic: bool,
    pub photo_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ProductResponse {
    // Build a response from a bare table row plus the farmer's display name.
    pub fn from_product(product: crate::models::product::Product, farmer_name: String) -> Self {
        Self {
            id: product.id,
            farmer_id: product.farmer_id,
            farmer_name,
            title: product.title,
            description: product.description,
            category: product.category,
            qty_kg: product.qty_kg,
            unit: product.unit,
            min_price: product.min_price,
            location: product.location,
            harvest_date: product.harvest_date,
            organic: product.organic,
            photo_url: product.photo_url,
            status: product.status,
            created_at: product.created_at,
        }
    }
}
