use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub region: String,
    pub language: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Roles allowed to self-register. Admin accounts are provisioned out of band.
pub const REGISTERABLE_ROLES: [&str; 2] = ["farmer", "buyer"];
