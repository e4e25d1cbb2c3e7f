//! Catalog search endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::catalog::CatalogError;
use crate::AppState;

fn default_type() -> String {
    "track".to_string()
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(rename = "type", default = "default_type")]
    pub entity_type: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// GET /api/search?query&type&limit
///
/// Direct catalog search; type is "track" or "artist".
pub async fn search_music(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, SearchError> {
    if query.query.trim().is_empty() {
        return Err(SearchError::InvalidQuery("query is required".to_string()));
    }
    let limit = query.limit.clamp(1, 50);

    let results = match query.entity_type.as_str() {
        "track" => {
            let tracks = state.catalog.search_tracks(&query.query, limit).await?;
            serde_json::to_value(tracks).map_err(internal)?
        }
        "artist" => {
            let artists = state.catalog.search_artists(&query.query, limit).await?;
            serde_json::to_value(artists).map_err(internal)?
        }
        other => {
            return Err(SearchError::InvalidQuery(format!(
                "Invalid search type: {} (expected track or artist)",
                other
            )))
        }
    };

    let total = results.as_array().map(|a| a.len()).unwrap_or(0);

    Ok(Json(json!({
        "results": results,
        "total": total,
        "query": query.query,
        "type": query.entity_type,
    })))
}

fn internal(e: serde_json::Error) -> SearchError {
    SearchError::Internal(e.to_string())
}

/// Search API errors
#[derive(Debug)]
pub enum SearchError {
    InvalidQuery(String),
    Catalog(CatalogError),
    Internal(String),
}

impl From<CatalogError> for SearchError {
    fn from(e: CatalogError) -> Self {
        SearchError::Catalog(e)
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SearchError::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, msg),
            SearchError::Catalog(e) => {
                tracing::error!("Catalog error in search API: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            SearchError::Internal(msg) => {
                tracing::error!("Internal error in search API: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
