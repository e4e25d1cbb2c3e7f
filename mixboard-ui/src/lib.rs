//! mixboard-ui library - playlist web service
//!
//! Browse and search an external music catalog, assemble playlists, and
//! manage accounts from a static browser UI.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

use crate::catalog::CatalogClient;

pub mod api;
pub mod catalog;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// External catalog client
    pub catalog: Arc<CatalogClient>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, catalog: Arc<CatalogClient>) -> Self {
        Self { db, catalog }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    Router::new()
        // Static UI
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/style.css", get(api::serve_style_css))
        // Health
        .route("/api/health", get(api::health_check))
        // Accounts
        .route("/api/users/register", post(api::register_user))
        .route("/api/users/login", post(api::login_user))
        .route("/api/users/:user_id", get(api::get_user_profile))
        // Recommendations (pass-through filtered catalog queries)
        .route("/api/recommendations/search", get(api::search_recommendations))
        .route("/api/recommendations/artist", get(api::artist_recommendations))
        .route("/api/recommendations/mood", get(api::mood_recommendations))
        // Playlists
        .route("/api/playlists", get(api::list_playlists))
        .route("/api/playlists/create", post(api::create_playlist))
        .route(
            "/api/playlists/:playlist_id",
            get(api::get_playlist_detail).delete(api::delete_playlist),
        )
        .route("/api/playlists/:playlist_id/tracks", post(api::add_track))
        .route(
            "/api/playlists/:playlist_id/tracks/:track_id",
            delete(api::remove_track),
        )
        // Catalog search
        .route("/api/search", get(api::search_music))
        // The UI is same-origin but the API stays open to other frontends
        .layer(CorsLayer::permissive())
        .with_state(state)
}
