//! Recommendation endpoints
//!
//! These are pass-through filtered catalog queries re-shaped into a uniform
//! envelope: genre search templates, artist top tracks, and mood phrase
//! fan-out. No scoring model sits behind any of them.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::json;

use crate::catalog::{mood, CatalogError, Track};
use crate::AppState;

fn default_genre() -> String {
    "pop".to_string()
}

fn default_search_limit() -> usize {
    20
}

fn default_artist_limit() -> usize {
    10
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    #[serde(default)]
    pub min_popularity: i64,
}

#[derive(Debug, Deserialize)]
pub struct ArtistQuery {
    pub artist_name: String,
    #[serde(default = "default_artist_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct MoodQuery {
    pub mood: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

/// GET /api/recommendations/search?genre&limit&min_popularity
///
/// Fans out over four fixed query templates for the genre, drops tracks
/// under the popularity floor, dedups by track id and returns the most
/// popular first. Individual query failures are skipped.
pub async fn search_recommendations(
    State(state): State<AppState>,
    Query(query): Query<GenreQuery>,
) -> Result<Json<serde_json::Value>, RecommendationError> {
    let limit = query.limit.clamp(1, 50);
    let min_popularity = query.min_popularity.clamp(0, 100);

    let search_queries = [
        format!("genre:{}", query.genre),
        format!("genre:{} year:2020-2024", query.genre),
        format!("{} popular", query.genre),
        format!("{} top hits", query.genre),
    ];
    let per_query = (limit / search_queries.len()).max(1);

    let mut all_tracks: Vec<Track> = Vec::new();
    for search_query in &search_queries {
        match state.catalog.search_tracks(search_query, per_query).await {
            Ok(tracks) => {
                all_tracks.extend(
                    tracks
                        .into_iter()
                        .filter(|t| t.popularity >= min_popularity),
                );
            }
            Err(e) => {
                tracing::warn!(query = %search_query, "Recommendation search failed: {}", e);
            }
        }
    }

    let mut final_tracks = dedup_by_id(all_tracks);
    final_tracks.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    let total = final_tracks.len();
    final_tracks.truncate(limit);

    Ok(Json(json!({
        "recommendations": final_tracks,
        "total": total,
        "method": "search_based",
        "genre": query.genre,
    })))
}

/// GET /api/recommendations/artist?artist_name&limit
///
/// Resolves the artist by name, then returns their catalog top tracks.
pub async fn artist_recommendations(
    State(state): State<AppState>,
    Query(query): Query<ArtistQuery>,
) -> Result<Json<serde_json::Value>, RecommendationError> {
    let limit = query.limit.clamp(1, 50);

    let artists = state.catalog.search_artists(&query.artist_name, 1).await?;
    let artist = artists
        .into_iter()
        .next()
        .ok_or(RecommendationError::ArtistNotFound)?;

    let mut recommendations = state.catalog.artist_top_tracks(&artist.id).await?;
    let total = recommendations.len();
    recommendations.truncate(limit);

    Ok(Json(json!({
        "recommendations": recommendations,
        "total": total,
        "method": "artist_based",
        "seed_artist": query.artist_name,
    })))
}

/// GET /api/recommendations/mood?mood&limit
///
/// Maps the mood keyword to its search phrases, fans out, dedups and
/// shuffles so repeat calls vary. Unknown moods are a client error.
pub async fn mood_recommendations(
    State(state): State<AppState>,
    Query(query): Query<MoodQuery>,
) -> Result<Json<serde_json::Value>, RecommendationError> {
    let limit = query.limit.clamp(1, 50);

    let mood_key = query.mood.to_lowercase();
    let phrases = mood::mood_queries(&mood_key).ok_or(RecommendationError::InvalidMood)?;

    let mut all_tracks: Vec<Track> = Vec::new();
    for phrase in phrases {
        match state.catalog.search_tracks(phrase, 10).await {
            Ok(tracks) => all_tracks.extend(tracks),
            Err(e) => {
                tracing::warn!(phrase = %phrase, "Mood search failed: {}", e);
            }
        }
    }

    let mut final_tracks = dedup_by_id(all_tracks);
    final_tracks.shuffle(&mut rand::thread_rng());
    let total = final_tracks.len();
    final_tracks.truncate(limit);

    Ok(Json(json!({
        "recommendations": final_tracks,
        "total": total,
        "method": "mood_based",
        "mood": mood_key,
    })))
}

/// Drop duplicate track ids, keeping the first occurrence
fn dedup_by_id(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen = std::collections::HashSet::new();
    tracks
        .into_iter()
        .filter(|track| seen.insert(track.id.clone()))
        .collect()
}

/// Recommendation API errors
#[derive(Debug)]
pub enum RecommendationError {
    InvalidMood,
    ArtistNotFound,
    Catalog(CatalogError),
}

impl From<CatalogError> for RecommendationError {
    fn from(e: CatalogError) -> Self {
        RecommendationError::Catalog(e)
    }
}

impl IntoResponse for RecommendationError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RecommendationError::InvalidMood => (
                StatusCode::BAD_REQUEST,
                format!("Invalid mood (expected one of: {})", mood::MOODS.join(", ")),
            ),
            RecommendationError::ArtistNotFound => {
                (StatusCode::NOT_FOUND, "Artist not found".to_string())
            }
            RecommendationError::Catalog(e) => {
                tracing::error!("Catalog error in recommendations API: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
