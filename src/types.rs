use std::fmt;

use chrono::Utc;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::Error;

/// Seconds before expiry at which an access token is treated as stale.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Unix timestamp (seconds); `None` when the provider did not say.
    pub expires_at: Option<i64>,
}

impl Token {
    /// Synthetic pair carrying only a refresh token. The access token is
    /// empty so the first request triggers a refresh.
    pub fn from_refresh_token(refresh_token: &str) -> Self {
        Token {
            access_token: String::new(),
            refresh_token: refresh_token.to_string(),
            token_type: "bearer".to_string(),
            expires_at: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        if self.access_token.is_empty() {
            return true;
        }
        match self.expires_at {
            Some(at) => Utc::now().timestamp() + EXPIRY_MARGIN_SECS >= at,
            None => false,
        }
    }
}

/// Body returned by the token endpoint for both grant types.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Converts into a `Token`, keeping `fallback_refresh` when the provider
    /// did not rotate the refresh token.
    pub fn into_token(self, fallback_refresh: &str) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| fallback_refresh.to_string()),
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_at: self.expires_in.map(|secs| Utc::now().timestamp() + secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ContentKind {
    Artist,
    Album,
    Track,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Artist => "artist",
            ContentKind::Album => "album",
            ContentKind::Track => "track",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticateStatus {
    AuthenticatedSuccessfully,
    AuthenticateFailed,
    AuthenticateFailedInvalidUri,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub release_date_precision: String,
    #[serde(default)]
    pub album_type: String,
    #[serde(default)]
    pub artists: Vec<AlbumArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<AlbumArtist>,
    #[serde(default)]
    pub album: Option<Album>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub artists: Option<Paging<Artist>>,
    #[serde(default)]
    pub albums: Option<Paging<Album>>,
    #[serde(default)]
    pub tracks: Option<Paging<Track>>,
}

/// One resolved catalog entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub id: String,
    pub kind: ContentKind,
    pub name: String,
    pub artists: Vec<String>,
}

impl From<Artist> for SearchResult {
    fn from(artist: Artist) -> Self {
        SearchResult {
            id: artist.id,
            kind: ContentKind::Artist,
            name: artist.name,
            artists: Vec::new(),
        }
    }
}

impl From<Album> for SearchResult {
    fn from(album: Album) -> Self {
        SearchResult {
            id: album.id,
            kind: ContentKind::Album,
            name: album.name,
            artists: album.artists.into_iter().map(|a| a.name).collect(),
        }
    }
}

impl From<Track> for SearchResult {
    fn from(track: Track) -> Self {
        SearchResult {
            id: track.id,
            kind: ContentKind::Track,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
        }
    }
}

/// Outcome of liking one entity. `error` is set when this item failed;
/// siblings in the same batch are unaffected.
#[derive(Debug)]
pub struct LikeResult {
    pub id: String,
    pub kind: ContentKind,
    pub name: String,
    pub artists: Vec<String>,
    pub skipped: bool,
    pub error: Option<Error>,
}

impl LikeResult {
    pub fn new(entity: SearchResult) -> Self {
        LikeResult {
            id: entity.id,
            kind: entity.kind,
            name: entity.name,
            artists: entity.artists,
            skipped: false,
            error: None,
        }
    }

    pub fn is_liked(&self) -> bool {
        !self.skipped && self.error.is_none()
    }
}

#[derive(Tabled)]
pub struct SearchTableRow {
    pub kind: String,
    pub id: String,
    pub name: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct LikeTableRow {
    pub kind: String,
    pub name: String,
    pub artists: String,
    pub status: String,
}
