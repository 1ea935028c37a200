use axum::http::Uri;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::NaiveDate;
use rand::{TryRngCore, rngs::OsRng};

use crate::{
    config::REFRESH_TOKEN_VAR,
    error::{Error, Result},
    types::Album,
};

/// Generates an opaque CSRF state token from `byte_length` bytes of OS
/// entropy, encoded as unpadded base64url.
///
/// A failing entropy source is reported as `Error::RandomSource`; there is no
/// fallback to a weaker generator.
pub fn generate_state(byte_length: isize) -> Result<String> {
    if byte_length < 0 {
        return Err(Error::InvalidLength(byte_length));
    }
    if byte_length == 0 {
        return Ok(String::new());
    }

    let mut bytes = vec![0u8; byte_length as usize];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| Error::RandomSource(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn parse_redirect_uri(redirect_uri: &str) -> Result<Uri> {
    let invalid = || Error::InvalidRedirectUri(redirect_uri.to_string());
    let uri: Uri = redirect_uri.parse().map_err(|_| invalid())?;
    if uri.scheme().is_none() || uri.host().is_none() {
        return Err(invalid());
    }
    Ok(uri)
}

/// Extracts the explicit port of the redirect URI.
///
/// `http://localhost:8080/callback` yields `8080`; a URI without a port (or
/// one that fails to parse) yields `Error::InvalidRedirectUri`.
pub fn redirect_port(redirect_uri: &str) -> Result<u16> {
    parse_redirect_uri(redirect_uri)?
        .port_u16()
        .ok_or_else(|| Error::InvalidRedirectUri(redirect_uri.to_string()))
}

/// Path the callback listener serves, taken from the redirect URI.
///
/// The path is registered as a literal route, so braces and segments that
/// start with `:` or `*` are rejected as `Error::InvalidRedirectUri`.
pub fn redirect_path(redirect_uri: &str) -> Result<String> {
    let uri = parse_redirect_uri(redirect_uri)?;
    let path = match uri.path() {
        "" => "/",
        path => path,
    };

    let is_pattern = path.contains(['{', '}'])
        || path
            .split('/')
            .any(|segment| segment.starts_with(':') || segment.starts_with('*'));
    if is_pattern {
        return Err(Error::InvalidRedirectUri(redirect_uri.to_string()));
    }
    Ok(path.to_string())
}

/// Checks that a Spotify ID is a plain base62 string before it is placed
/// into a request path.
pub fn validate_id(id: &str) -> Result<&str> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidId(id.to_string()));
    }
    Ok(id)
}

/// Parses a Spotify release date of `day`, `month` or `year` precision.
pub fn parse_release_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", date), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01-01", date), "%Y-%m-%d"))
        .ok()
}

/// Sorts albums by release date ascending. The sort is stable, so albums
/// released on the same date keep the provider's order. Unparseable dates
/// sort first.
pub fn sort_albums_by_release_date(albums: &mut [Album]) {
    albums.sort_by_key(|album| parse_release_date(&album.release_date));
}

fn is_env_line_for(line: &str, key: &str) -> bool {
    let line = line.trim_start();
    let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
    line.strip_prefix(key)
        .map(|rest| rest.trim_start().starts_with('='))
        .unwrap_or(false)
}

/// Sets `key=value` in `.env` file contents, replacing an existing entry.
pub fn upsert_env_var(contents: &str, key: &str, value: &str) -> String {
    let entry = format!("{}={}", key, value);
    let mut replaced = false;
    let mut lines: Vec<String> = contents
        .lines()
        .map(|line| {
            if is_env_line_for(line, key) {
                replaced = true;
                entry.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !replaced {
        lines.push(entry);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Removes every entry for `key` from `.env` file contents.
pub fn remove_env_var(contents: &str, key: &str) -> String {
    let lines: Vec<&str> = contents
        .lines()
        .filter(|line| !is_env_line_for(line, key))
        .collect();

    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Shell command the user can run to keep the refresh token for later runs.
pub fn export_command(refresh_token: &str) -> String {
    format!("export {}=\"{}\"", REFRESH_TOKEN_VAR, refresh_token)
}
