//! Account endpoints: register, login, profile
//!
//! Credentials are checked against salted SHA-256 hashes in the users
//! table. There are no sessions or tokens; login returns the user object
//! and the UI keeps it client-side.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use mixboard_common::db::models::UserRow;
use mixboard_common::password;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Public view of a user (no hash/salt)
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// POST /api/users/register
///
/// Creates an account. Username and email must both be unused.
pub async fn register_user(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Json<serde_json::Value>, UserError> {
    if form.username.trim().is_empty() || form.email.trim().is_empty() {
        return Err(UserError::InvalidInput(
            "username and email are required".to_string(),
        ));
    }
    if form.password.is_empty() {
        return Err(UserError::InvalidInput("password is required".to_string()));
    }

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE username = ? OR email = ?")
            .bind(&form.username)
            .bind(&form.email)
            .fetch_optional(&state.db)
            .await
            .map_err(internal)?;

    if existing.is_some() {
        return Err(UserError::AlreadyExists);
    }

    let salt = password::generate_salt();
    let hash = password::hash_password(&form.password, &salt);

    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash, password_salt) VALUES (?, ?, ?, ?)",
    )
    .bind(&form.username)
    .bind(&form.email)
    .bind(&hash)
    .bind(&salt)
    .execute(&state.db)
    .await
    .map_err(internal)?;

    let user_id = result.last_insert_rowid();
    tracing::info!(user_id, username = %form.username, "Registered new user");

    Ok(Json(json!({
        "message": "User registered successfully",
        "user_id": user_id,
        "username": form.username,
    })))
}

/// POST /api/users/login
///
/// Plain credential check; inactive accounts cannot log in.
pub async fn login_user(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<serde_json::Value>, UserError> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT * FROM users WHERE username = ? AND is_active = 1",
    )
    .bind(&form.username)
    .fetch_optional(&state.db)
    .await
    .map_err(internal)?;

    let user = match user {
        Some(user)
            if password::verify_password(&form.password, &user.password_salt, &user.password_hash) =>
        {
            user
        }
        _ => return Err(UserError::InvalidCredentials),
    };

    Ok(Json(json!({
        "message": "Login successful",
        "user": UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    })))
}

/// GET /api/users/:user_id
///
/// Profile with owned playlist count.
pub async fn get_user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, UserError> {
    let row = sqlx::query_as::<_, (i64, String, String, chrono::NaiveDateTime, i64)>(
        r#"
        SELECT u.id, u.username, u.email, u.created_at,
               COUNT(p.id) AS playlist_count
        FROM users u
        LEFT JOIN playlists p ON u.id = p.user_id
        WHERE u.id = ? AND u.is_active = 1
        GROUP BY u.id, u.username, u.email, u.created_at
        "#,
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await
    .map_err(internal)?;

    let (id, username, email, created_at, playlist_count) =
        row.ok_or(UserError::NotFound)?;

    Ok(Json(json!({
        "user": {
            "id": id,
            "username": username,
            "email": email,
            "created_at": created_at.and_utc().to_rfc3339(),
            "playlist_count": playlist_count,
        },
    })))
}

fn internal(e: sqlx::Error) -> UserError {
    UserError::Database(e.to_string())
}

/// Account API errors
#[derive(Debug)]
pub enum UserError {
    AlreadyExists,
    InvalidCredentials,
    InvalidInput(String),
    NotFound,
    Database(String),
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            UserError::AlreadyExists => {
                (StatusCode::BAD_REQUEST, "User already exists".to_string())
            }
            UserError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            UserError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            UserError::NotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            UserError::Database(msg) => {
                tracing::error!("Database error in users API: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
