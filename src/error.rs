use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::AuthenticateStatus;

/// Errors produced by the authentication core and the API wrappers.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid state length {0}: must not be negative")]
    InvalidLength(isize),

    #[error("Secure random source failed: {0}")]
    RandomSource(String),

    #[error("Invalid redirect URI '{0}': an explicit port is required")]
    InvalidRedirectUri(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("OAuth state mismatch - possible CSRF attack")]
    StateMismatch,

    #[error("Authentication timed out after {} seconds", .0.as_secs())]
    AuthenticationTimeout(Duration),

    #[error("No results found for '{0}'")]
    NoResults(String),

    #[error("Content not found for id '{0}'")]
    ContentNotFound(String),

    #[error("Invalid Spotify id '{0}': only letters and digits are allowed")]
    InvalidId(String),

    #[error("Missing credential: {0} must be set")]
    MissingCredentials(&'static str),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Status reported to callers of `Authorizer::authenticate` for this error.
    pub fn status(&self) -> AuthenticateStatus {
        match self {
            Error::InvalidRedirectUri(_) => AuthenticateStatus::AuthenticateFailedInvalidUri,
            _ => AuthenticateStatus::AuthenticateFailed,
        }
    }

    /// True when the provider rejected the credentials, as opposed to a
    /// transport problem. Callers use this to decide whether a stored
    /// refresh token should be cleared.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Error::AuthenticationFailed(_) | Error::StateMismatch)
    }

    /// True when the provider could not be reached or failed on its side, so
    /// the answer says nothing about the requested content.
    pub fn is_provider_unavailable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Http { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
