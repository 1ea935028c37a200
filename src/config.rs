//! Configuration management for spotlike.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage the Spotify
//! API credentials, the OAuth redirect URI and the stored refresh token.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (endpoint URLs and the authentication deadline)

use std::{env, path::PathBuf, time::Duration};

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const REDIRECT_URI_VAR: &str = "SPOTIFY_REDIRECT_URI";
pub const REFRESH_TOKEN_VAR: &str = "SPOTIFY_REFRESH_TOKEN";

const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 180;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist and loads variables from
/// `spotlike/.env` inside the platform-specific local data directory. Values
/// already present in the process environment are not overridden. A missing
/// file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotlike/.env`
/// - macOS: `~/Library/Application Support/spotlike/.env`
/// - Windows: `%LOCALAPPDATA%/spotlike/.env`
///
/// # Errors
///
/// Returns an error string if the parent directory cannot be created or the
/// `.env` file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Location of the `.env` file holding credentials and the refresh token.
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotlike/.env");
    path
}

fn var_or_empty(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

fn var_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Returns the Spotify API client ID, or an empty string when unset.
pub fn spotify_client_id() -> String {
    var_or_empty(CLIENT_ID_VAR)
}

/// Returns the Spotify API client secret, or an empty string when unset.
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> String {
    var_or_empty(CLIENT_SECRET_VAR)
}

/// Returns the OAuth redirect URI, e.g. `http://localhost:8080/callback`.
///
/// This must match the redirect URI registered in the Spotify application
/// settings and must carry an explicit port.
pub fn spotify_redirect_uri() -> String {
    var_or_empty(REDIRECT_URI_VAR)
}

/// Returns the stored refresh token, or an empty string when none is stored.
pub fn spotify_refresh_token() -> String {
    var_or_empty(REFRESH_TOKEN_VAR)
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Deadline for one interactive authorization attempt.
pub fn auth_timeout() -> Duration {
    let secs = env::var("SPOTIFY_AUTH_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_AUTH_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// True only if client ID, client secret, redirect URI and refresh token are
/// all non-empty in the current environment.
pub fn is_environment_configured() -> bool {
    AuthSession::from_env().is_complete()
}

/// Credentials for one process invocation.
#[derive(Clone, Default)]
pub struct AuthSession {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub refresh_token: String,
}

impl AuthSession {
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        AuthSession {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            refresh_token: String::new(),
        }
    }

    pub fn from_env() -> Self {
        AuthSession {
            client_id: spotify_client_id(),
            client_secret: spotify_client_secret(),
            redirect_uri: spotify_redirect_uri(),
            refresh_token: spotify_refresh_token(),
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: &str) -> Self {
        self.refresh_token = refresh_token.to_string();
        self
    }

    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty()
            && !self.client_secret.is_empty()
            && !self.redirect_uri.is_empty()
            && self.has_refresh_token()
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("has_refresh_token", &self.has_refresh_token())
            .finish()
    }
}

/// Provider endpoints. Overridable so tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub api_url: String,
}

impl Endpoints {
    pub fn from_env() -> Self {
        Endpoints {
            authorize_url: spotify_apiauth_url(),
            token_url: spotify_apitoken_url(),
            api_url: spotify_apiurl(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            authorize_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}
