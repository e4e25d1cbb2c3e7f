//! Music catalog API client
//!
//! Wraps the Spotify Web API behind the shaped `Track`/`Artist` types.
//! Authenticates with the client-credentials grant, spaces outbound
//! requests to stay under the rate limit, and caches shaped responses
//! in-process with per-call TTLs.

use std::time::{Duration, Instant};

use base64::Engine;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

use super::cache::TtlCache;
use super::types::{
    ApiSearchResponse, ApiTokenResponse, ApiTopTracksResponse, ApiTracksResponse, Artist, Track,
};

const API_BASE_URL: &str = "https://api.spotify.com/v1";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const USER_AGENT: &str = concat!("mixboard/", env!("CARGO_PKG_VERSION"));
const RATE_LIMIT_MS: u64 = 100; // minimum spacing between outbound requests
const MARKET: &str = "US";

/// Refresh the access token this long before it actually expires
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Response cache TTLs
const SEARCH_TTL: Duration = Duration::from_secs(3600); // 1 hour
const TOP_TRACKS_TTL: Duration = Duration::from_secs(43200); // 12 hours
const TRACK_LOOKUP_TTL: Duration = Duration::from_secs(86400); // 24 hours

/// Batch track lookup limit imposed by the catalog API
const TRACKS_BATCH_SIZE: usize = 50;

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog credentials not configured")]
    Unconfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog authentication failed: {0}")]
    AuthFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

struct Credentials {
    client_id: String,
    client_secret: String,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Music catalog API client
pub struct CatalogClient {
    http: reqwest::Client,
    credentials: Option<Credentials>,
    token: Mutex<Option<CachedToken>>,
    rate_limiter: RateLimiter,
    track_cache: TtlCache<Vec<Track>>,
    artist_cache: TtlCache<Vec<Artist>>,
}

impl CatalogClient {
    /// Create a client from optional credentials.
    ///
    /// An unconfigured client is still constructed (the service starts and
    /// serves accounts/playlists); catalog calls then fail with
    /// `CatalogError::Unconfigured`.
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let credentials = match (client_id, client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(Credentials {
                    client_id: id,
                    client_secret: secret,
                })
            }
            _ => None,
        };

        Ok(Self {
            http,
            credentials,
            token: Mutex::new(None),
            rate_limiter: RateLimiter::new(RATE_LIMIT_MS),
            track_cache: TtlCache::new(),
            artist_cache: TtlCache::new(),
        })
    }

    /// True when catalog credentials are present
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Search the catalog for tracks matching a free-text query
    pub async fn search_tracks(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        let limit = limit.clamp(1, 50);
        let cache_key = format!("search-tracks:{}:{}", query, limit);

        if let Some(tracks) = self.track_cache.get(&cache_key).await {
            return Ok(tracks);
        }

        let response: ApiSearchResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                    ("market", MARKET.to_string()),
                ],
            )
            .await?;

        let tracks: Vec<Track> = response
            .tracks
            .map(|paging| paging.items.into_iter().map(Track::from).collect())
            .unwrap_or_default();

        self.track_cache
            .insert(cache_key, tracks.clone(), SEARCH_TTL)
            .await;

        Ok(tracks)
    }

    /// Search the catalog for artists matching a free-text query
    pub async fn search_artists(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Artist>, CatalogError> {
        let limit = limit.clamp(1, 50);
        let cache_key = format!("search-artists:{}:{}", query, limit);

        if let Some(artists) = self.artist_cache.get(&cache_key).await {
            return Ok(artists);
        }

        let response: ApiSearchResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "artist".to_string()),
                    ("limit", limit.to_string()),
                    ("market", MARKET.to_string()),
                ],
            )
            .await?;

        let artists: Vec<Artist> = response
            .artists
            .map(|paging| paging.items.into_iter().map(Artist::from).collect())
            .unwrap_or_default();

        self.artist_cache
            .insert(cache_key, artists.clone(), SEARCH_TTL)
            .await;

        Ok(artists)
    }

    /// Get an artist's top tracks
    pub async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<Track>, CatalogError> {
        let cache_key = format!("artist-top:{}:{}", artist_id, MARKET);

        if let Some(tracks) = self.track_cache.get(&cache_key).await {
            return Ok(tracks);
        }

        let response: ApiTopTracksResponse = self
            .get_json(
                &format!("/artists/{}/top-tracks", artist_id),
                &[("market", MARKET.to_string())],
            )
            .await?;

        let tracks: Vec<Track> = response.tracks.into_iter().map(Track::from).collect();

        self.track_cache
            .insert(cache_key, tracks.clone(), TOP_TRACKS_TTL)
            .await;

        Ok(tracks)
    }

    /// Batch track lookup, preserving input order.
    ///
    /// Chunked at the catalog's 50-id request limit; ids the catalog does
    /// not know are silently dropped from the result.
    pub async fn tracks(&self, track_ids: &[String]) -> Result<Vec<Track>, CatalogError> {
        if track_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_tracks = Vec::with_capacity(track_ids.len());

        for chunk in track_ids.chunks(TRACKS_BATCH_SIZE) {
            let ids = chunk.join(",");
            let cache_key = format!("tracks:{}", ids);

            if let Some(tracks) = self.track_cache.get(&cache_key).await {
                all_tracks.extend(tracks);
                continue;
            }

            let response: ApiTracksResponse =
                self.get_json("/tracks", &[("ids", ids)]).await?;

            let tracks: Vec<Track> = response
                .tracks
                .into_iter()
                .flatten()
                .map(Track::from)
                .collect();

            self.track_cache
                .insert(cache_key, tracks.clone(), TRACK_LOOKUP_TTL)
                .await;

            all_tracks.extend(tracks);
        }

        Ok(all_tracks)
    }

    /// Authenticated GET against the catalog API
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let token = self.access_token().await?;

        self.rate_limiter.wait().await;

        let url = format!("{}{}", API_BASE_URL, path);
        tracing::debug!(url = %url, "Querying catalog API");

        let response = self
            .http
            .get(&url)
            .query(query)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            // Token revoked or expired early; drop it so the next call
            // re-authenticates
            *self.token.lock().await = None;
            return Err(CatalogError::AuthFailed("access token rejected".to_string()));
        }

        if status == 404 {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        if status == 429 {
            return Err(CatalogError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Get a valid access token, requesting a fresh one when missing or
    /// near expiry (client-credentials grant).
    async fn access_token(&self) -> Result<String, CatalogError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(CatalogError::Unconfigured)?;

        let mut token = self.token.lock().await;

        if let Some(cached) = token.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.value.clone());
            }
        }

        self.rate_limiter.wait().await;

        let basic = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            credentials.client_id, credentials.client_secret
        ));

        let response = self
            .http
            .post(TOKEN_URL)
            .header("Authorization", format!("Basic {}", basic))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::AuthFailed(format!(
                "token request returned {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let parsed: ApiTokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        let lifetime = Duration::from_secs(parsed.expires_in)
            .saturating_sub(TOKEN_REFRESH_MARGIN);

        let value = parsed.access_token.clone();
        *token = Some(CachedToken {
            value: parsed.access_token,
            expires_at: Instant::now() + lifetime,
        });

        tracing::info!("Obtained catalog access token (valid {:?})", lifetime);

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_with_credentials() {
        let client = CatalogClient::new(Some("id".to_string()), Some("secret".to_string()));
        assert!(client.is_ok());
        assert!(client.unwrap().is_configured());
    }

    #[test]
    fn test_client_creation_without_credentials() {
        let client = CatalogClient::new(None, None).unwrap();
        assert!(!client.is_configured());
    }

    #[test]
    fn test_empty_credentials_count_as_unconfigured() {
        let client =
            CatalogClient::new(Some(String::new()), Some("secret".to_string())).unwrap();
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_client_rejects_calls() {
        let client = CatalogClient::new(None, None).unwrap();
        let result = client.search_tracks("anything", 10).await;
        assert!(matches!(result, Err(CatalogError::Unconfigured)));
    }

    #[tokio::test]
    async fn test_empty_batch_lookup_makes_no_request() {
        let client = CatalogClient::new(None, None).unwrap();
        // No credentials, so any outbound attempt would error; empty input
        // must short-circuit instead
        let tracks = client.tracks(&[]).await.unwrap();
        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limiter_timing() {
        let limiter = RateLimiter::new(50);

        let start = Instant::now();

        // First request - no wait
        limiter.wait().await;
        let first_elapsed = start.elapsed();

        // Second request - should wait ~50ms
        limiter.wait().await;
        let second_elapsed = start.elapsed();

        assert!(first_elapsed < Duration::from_millis(25));
        assert!(second_elapsed >= Duration::from_millis(45));
    }
}
