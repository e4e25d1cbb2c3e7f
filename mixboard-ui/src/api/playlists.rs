//! Playlist endpoints
//!
//! Playlists persist only catalog track ids; display metadata is hydrated
//! through the catalog client when a playlist is viewed. Ownership is fixed
//! at creation and gates every mutation; the is_public flag gates whether
//! non-owners can see a playlist at all.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use mixboard_common::db::models::PlaylistRow;

use crate::catalog::Track;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// When present, list this user's own playlists (including private);
    /// otherwise list all public playlists
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    /// The requesting user, used only for private-playlist visibility
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// Optional comma-separated catalog track ids to seed the playlist
    #[serde(default)]
    pub track_ids: String,
}

#[derive(Debug, Deserialize)]
pub struct AddTrackForm {
    pub user_id: i64,
    pub track_id: String,
    pub position: Option<i64>,
}

/// Playlist summary used by the list endpoint
#[derive(Debug, Serialize)]
pub struct PlaylistSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub is_public: bool,
    pub creator: String,
    pub track_count: i64,
}

/// GET /api/playlists?user_id
pub async fn list_playlists(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, PlaylistError> {
    let rows = if let Some(user_id) = query.user_id {
        sqlx::query_as::<_, (i64, String, String, chrono::NaiveDateTime, bool, String, i64)>(
            r#"
            SELECT p.id, p.name, p.description, p.created_at, p.is_public,
                   u.username, COUNT(pt.track_id) AS track_count
            FROM playlists p
            JOIN users u ON p.user_id = u.id
            LEFT JOIN playlist_tracks pt ON p.id = pt.playlist_id
            WHERE p.user_id = ?
            GROUP BY p.id, p.name, p.description, p.created_at, p.is_public, u.username
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&state.db)
        .await
    } else {
        sqlx::query_as::<_, (i64, String, String, chrono::NaiveDateTime, bool, String, i64)>(
            r#"
            SELECT p.id, p.name, p.description, p.created_at, p.is_public,
                   u.username, COUNT(pt.track_id) AS track_count
            FROM playlists p
            JOIN users u ON p.user_id = u.id
            LEFT JOIN playlist_tracks pt ON p.id = pt.playlist_id
            WHERE p.is_public = 1
            GROUP BY p.id, p.name, p.description, p.created_at, p.is_public, u.username
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .fetch_all(&state.db)
        .await
    }
    .map_err(internal)?;

    let playlists: Vec<PlaylistSummary> = rows
        .into_iter()
        .map(
            |(id, name, description, created_at, is_public, creator, track_count)| {
                PlaylistSummary {
                    id,
                    name,
                    description,
                    created_at: created_at.and_utc().to_rfc3339(),
                    is_public,
                    creator,
                    track_count,
                }
            },
        )
        .collect();

    Ok(Json(json!({ "playlists": playlists })))
}

/// POST /api/playlists/create
///
/// Creates a playlist, optionally seeded with an ordered list of track
/// ids. Duplicate seed ids are dropped (first occurrence wins).
pub async fn create_playlist(
    State(state): State<AppState>,
    Form(form): Form<CreateForm>,
) -> Result<Json<serde_json::Value>, PlaylistError> {
    if form.name.trim().is_empty() {
        return Err(PlaylistError::InvalidInput(
            "playlist name is required".to_string(),
        ));
    }

    let owner: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE id = ? AND is_active = 1")
            .bind(form.user_id)
            .fetch_optional(&state.db)
            .await
            .map_err(internal)?;
    if owner.is_none() {
        return Err(PlaylistError::UserNotFound);
    }

    // Dedupe seed ids preserving first occurrence so positions stay dense
    let mut seed_ids: Vec<&str> = Vec::new();
    for id in form.track_ids.split(',') {
        let id = id.trim();
        if !id.is_empty() && !seed_ids.contains(&id) {
            seed_ids.push(id);
        }
    }

    let mut tx = state.db.begin().await.map_err(internal)?;

    let result =
        sqlx::query("INSERT INTO playlists (user_id, name, description, is_public) VALUES (?, ?, ?, ?)")
            .bind(form.user_id)
            .bind(&form.name)
            .bind(&form.description)
            .bind(form.is_public)
            .execute(&mut *tx)
            .await
            .map_err(internal)?;

    let playlist_id = result.last_insert_rowid();

    for (position, track_id) in seed_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO playlist_tracks (playlist_id, track_id, position) VALUES (?, ?, ?)",
        )
        .bind(playlist_id)
        .bind(track_id)
        .bind(position as i64)
        .execute(&mut *tx)
        .await
        .map_err(internal)?;
    }

    tx.commit().await.map_err(internal)?;

    tracing::info!(playlist_id, owner = form.user_id, "Created playlist");

    Ok(Json(json!({
        "message": "Playlist created successfully",
        "playlist_id": playlist_id,
        "name": form.name,
        "track_count": seed_ids.len(),
    })))
}

/// GET /api/playlists/:playlist_id?user_id
///
/// Playlist metadata plus its tracks hydrated from the catalog. A private
/// playlist is indistinguishable from a missing one for non-owners.
pub async fn get_playlist_detail(
    State(state): State<AppState>,
    Path(playlist_id): Path<i64>,
    Query(viewer): Query<ViewerQuery>,
) -> Result<Json<serde_json::Value>, PlaylistError> {
    let playlist = fetch_playlist(&state, playlist_id).await?;

    if !playlist.is_public && viewer.user_id != Some(playlist.user_id) {
        return Err(PlaylistError::NotFound);
    }

    let creator: String = sqlx::query_scalar("SELECT username FROM users WHERE id = ?")
        .bind(playlist.user_id)
        .fetch_one(&state.db)
        .await
        .map_err(internal)?;

    let track_ids: Vec<String> = sqlx::query_scalar(
        "SELECT track_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY position",
    )
    .bind(playlist_id)
    .fetch_all(&state.db)
    .await
    .map_err(internal)?;

    // Hydrate display metadata from the catalog; an unreachable catalog
    // degrades to bare metadata rather than failing the whole request
    let tracks: Vec<Track> = if track_ids.is_empty() {
        Vec::new()
    } else {
        match state.catalog.tracks(&track_ids).await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!(playlist_id, "Failed to hydrate playlist tracks: {}", e);
                Vec::new()
            }
        }
    };

    let total_duration_ms: i64 = tracks.iter().map(|t| t.duration_ms).sum();

    Ok(Json(json!({
        "playlist": {
            "id": playlist.id,
            "name": playlist.name,
            "description": playlist.description,
            "created_at": playlist.created_at.and_utc().to_rfc3339(),
            "is_public": playlist.is_public,
            "creator": creator,
            "track_count": track_ids.len(),
            "total_duration_ms": total_duration_ms,
        },
        "tracks": tracks,
    })))
}

/// POST /api/playlists/:playlist_id/tracks
///
/// Appends a track, or inserts at an explicit position. Positions stay
/// dense: an explicit position is clamped into 0..=len and the tracks at
/// or after it shift up by one. Each track id may appear at most once per
/// playlist.
pub async fn add_track(
    State(state): State<AppState>,
    Path(playlist_id): Path<i64>,
    Form(form): Form<AddTrackForm>,
) -> Result<Json<serde_json::Value>, PlaylistError> {
    if form.track_id.trim().is_empty() {
        return Err(PlaylistError::InvalidInput(
            "track_id is required".to_string(),
        ));
    }

    let playlist = fetch_playlist(&state, playlist_id).await?;
    if playlist.user_id != form.user_id {
        return Err(PlaylistError::NotOwner);
    }

    let mut tx = state.db.begin().await.map_err(internal)?;

    let track_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM playlist_tracks WHERE playlist_id = ?")
            .bind(playlist_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(internal)?;

    let position = match form.position {
        Some(position) => position.clamp(0, track_count),
        None => track_count,
    };

    if position < track_count {
        sqlx::query(
            "UPDATE playlist_tracks SET position = position + 1 \
             WHERE playlist_id = ? AND position >= ?",
        )
        .bind(playlist_id)
        .bind(position)
        .execute(&mut *tx)
        .await
        .map_err(internal)?;
    }

    let inserted = sqlx::query(
        "INSERT INTO playlist_tracks (playlist_id, track_id, position) VALUES (?, ?, ?)",
    )
    .bind(playlist_id)
    .bind(form.track_id.trim())
    .bind(position)
    .execute(&mut *tx)
    .await;

    // A failed insert drops the transaction, undoing the shift
    match inserted {
        Ok(_) => {
            tx.commit().await.map_err(internal)?;
            Ok(Json(json!({
                "message": "Track added to playlist",
                "position": position,
            })))
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(PlaylistError::DuplicateTrack)
        }
        Err(e) => Err(internal(e)),
    }
}

/// DELETE /api/playlists/:playlist_id/tracks/:track_id?user_id
///
/// Owner only. Tracks after the removed one shift down so positions stay
/// dense.
pub async fn remove_track(
    State(state): State<AppState>,
    Path((playlist_id, track_id)): Path<(i64, String)>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<serde_json::Value>, PlaylistError> {
    let playlist = fetch_playlist(&state, playlist_id).await?;
    if playlist.user_id != owner.user_id {
        return Err(PlaylistError::NotOwner);
    }

    let mut tx = state.db.begin().await.map_err(internal)?;

    let removed_position: Option<i64> = sqlx::query_scalar(
        "SELECT position FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?",
    )
    .bind(playlist_id)
    .bind(&track_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(internal)?;

    let Some(removed_position) = removed_position else {
        return Err(PlaylistError::TrackNotFound);
    };

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
        .bind(playlist_id)
        .bind(&track_id)
        .execute(&mut *tx)
        .await
        .map_err(internal)?;

    sqlx::query(
        "UPDATE playlist_tracks SET position = position - 1 \
         WHERE playlist_id = ? AND position > ?",
    )
    .bind(playlist_id)
    .bind(removed_position)
    .execute(&mut *tx)
    .await
    .map_err(internal)?;

    tx.commit().await.map_err(internal)?;

    Ok(Json(json!({ "message": "Track removed from playlist" })))
}

/// DELETE /api/playlists/:playlist_id?user_id
///
/// Owner-only; membership rows cascade.
pub async fn delete_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<i64>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<serde_json::Value>, PlaylistError> {
    let playlist = fetch_playlist(&state, playlist_id).await?;
    if playlist.user_id != owner.user_id {
        return Err(PlaylistError::NotOwner);
    }

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(playlist_id)
        .execute(&state.db)
        .await
        .map_err(internal)?;

    tracing::info!(playlist_id, "Deleted playlist");

    Ok(Json(json!({ "message": "Playlist deleted successfully" })))
}

async fn fetch_playlist(state: &AppState, playlist_id: i64) -> Result<PlaylistRow, PlaylistError> {
    sqlx::query_as::<_, PlaylistRow>("SELECT * FROM playlists WHERE id = ?")
        .bind(playlist_id)
        .fetch_optional(&state.db)
        .await
        .map_err(internal)?
        .ok_or(PlaylistError::NotFound)
}

fn internal(e: sqlx::Error) -> PlaylistError {
    PlaylistError::Database(e.to_string())
}

/// Playlist API errors
#[derive(Debug)]
pub enum PlaylistError {
    NotFound,
    TrackNotFound,
    UserNotFound,
    NotOwner,
    DuplicateTrack,
    InvalidInput(String),
    Database(String),
}

impl IntoResponse for PlaylistError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            PlaylistError::NotFound => {
                (StatusCode::NOT_FOUND, "Playlist not found".to_string())
            }
            PlaylistError::TrackNotFound => {
                (StatusCode::NOT_FOUND, "Track not in playlist".to_string())
            }
            PlaylistError::UserNotFound => {
                (StatusCode::NOT_FOUND, "User not found".to_string())
            }
            PlaylistError::NotOwner => (
                StatusCode::FORBIDDEN,
                "Only the playlist owner can do that".to_string(),
            ),
            PlaylistError::DuplicateTrack => (
                StatusCode::CONFLICT,
                "Track already in playlist".to_string(),
            ),
            PlaylistError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            PlaylistError::Database(msg) => {
                tracing::error!("Database error in playlists API: {}", msg);
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
