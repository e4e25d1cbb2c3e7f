//! Catalog API wire types and the shaped response types served to clients
//!
//! The raw `Api*` structs mirror the subset of the Spotify Web API JSON that
//! the service consumes. Handlers only ever see the shaped `Track` and
//! `Artist` forms.

use serde::{Deserialize, Serialize};

/// Uniform track shape returned by every recommendation/search endpoint.
///
/// Display fields are denormalized from the catalog at query time; only the
/// `id` is ever persisted (in playlist membership rows).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// All credited artist names, comma-joined
    pub artist: String,
    pub album: String,
    pub popularity: i64,
    pub preview_url: Option<String>,
    pub external_url: Option<String>,
    /// First (largest) album artwork image, if any
    pub image_url: Option<String>,
    pub duration_ms: i64,
}

/// Uniform artist shape for artist search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub popularity: i64,
    pub genres: Vec<String>,
    pub external_url: Option<String>,
    pub image_url: Option<String>,
    pub followers: i64,
}

// ---------------------------------------------------------------------------
// Raw wire types

/// Token endpoint response (client-credentials grant)
#[derive(Debug, Deserialize)]
pub struct ApiTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// Search endpoint response; only the requested entity key is present
#[derive(Debug, Deserialize)]
pub struct ApiSearchResponse {
    pub tracks: Option<ApiPaging<ApiTrack>>,
    pub artists: Option<ApiPaging<ApiArtist>>,
}

/// Paging wrapper around search items
#[derive(Debug, Deserialize)]
pub struct ApiPaging<T> {
    // An explicit default fn keeps the derive from requiring T: Default
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Batch track lookup response; unknown ids come back as null entries
#[derive(Debug, Deserialize)]
pub struct ApiTracksResponse {
    pub tracks: Vec<Option<ApiTrack>>,
}

/// Artist top-tracks endpoint response
#[derive(Debug, Deserialize)]
pub struct ApiTopTracksResponse {
    pub tracks: Vec<ApiTrack>,
}

#[derive(Debug, Deserialize)]
pub struct ApiTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ApiArtistRef>,
    pub album: ApiAlbum,
    #[serde(default)]
    pub popularity: i64,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ApiExternalUrls,
    #[serde(default)]
    pub duration_ms: i64,
}

#[derive(Debug, Deserialize)]
pub struct ApiArtistRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
pub struct ApiImage {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub popularity: i64,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub external_urls: ApiExternalUrls,
    #[serde(default)]
    pub images: Vec<ApiImage>,
    #[serde(default)]
    pub followers: ApiFollowers,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiFollowers {
    #[serde(default)]
    pub total: i64,
}

impl From<ApiTrack> for Track {
    fn from(raw: ApiTrack) -> Self {
        let artist = raw
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let image_url = raw.album.images.first().map(|img| img.url.clone());

        Track {
            id: raw.id,
            name: raw.name,
            artist,
            album: raw.album.name,
            popularity: raw.popularity,
            preview_url: raw.preview_url,
            external_url: raw.external_urls.spotify,
            image_url,
            duration_ms: raw.duration_ms,
        }
    }
}

impl From<ApiArtist> for Artist {
    fn from(raw: ApiArtist) -> Self {
        let image_url = raw.images.first().map(|img| img.url.clone());

        Artist {
            id: raw.id,
            name: raw.name,
            popularity: raw.popularity,
            genres: raw.genres,
            external_url: raw.external_urls.spotify,
            image_url,
            followers: raw.followers.total,
        }
    }
}
