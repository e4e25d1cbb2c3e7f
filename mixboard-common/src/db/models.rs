//! Database row models

use serde::{Deserialize, Serialize};

/// Row of the users table (hash and salt stay server-side, never serialized)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}

/// Row of the playlists table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlaylistRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub created_at: chrono::NaiveDateTime,
}
