use crate::{
    error::{Error, Result},
    spotify::{albums, artists, client::AuthenticatedClient, tracks},
    types::{ContentKind, SearchResponse, SearchResult},
    utils,
};

/// Number of results per category when the caller does not ask for more.
pub const DEFAULT_LIMIT: u32 = 1;

const ALL_KINDS: &str = "artist,album,track";

/// Free-text search restricted to `kind`, or across all kinds when `None`.
///
/// Results are ordered artists, albums, tracks, each in provider ranking.
/// Fails with `Error::NoResults` when no category yields anything.
pub async fn search_by_query(
    client: &AuthenticatedClient,
    kind: Option<ContentKind>,
    query: &str,
    limit: u32,
) -> Result<Vec<SearchResult>> {
    let types = kind.map(|k| k.as_str()).unwrap_or(ALL_KINDS);
    let limit = limit.max(1).to_string();

    let response: SearchResponse = client
        .get_json(
            "/search",
            &[("q", query), ("type", types), ("limit", limit.as_str())],
        )
        .await?;

    let mut results: Vec<SearchResult> = Vec::new();
    if let Some(page) = response.artists {
        results.extend(page.items.into_iter().map(SearchResult::from));
    }
    if let Some(page) = response.albums {
        results.extend(page.items.into_iter().map(SearchResult::from));
    }
    if let Some(page) = response.tracks {
        results.extend(page.items.into_iter().map(SearchResult::from));
    }

    if results.is_empty() {
        return Err(Error::NoResults(query.to_string()));
    }
    Ok(results)
}

/// Whether a failed probe should end the lookup instead of moving on to the
/// next kind.
fn aborts_probe(error: &Error) -> bool {
    error.is_authentication_failure() || error.is_provider_unavailable()
}

/// Resolves an opaque ID by probing artist, then album, then track.
///
/// IDs do not say what they identify and the API has no unified lookup, so
/// the first probe that resolves wins. A rejected refresh token, an
/// unreachable provider or a provider-side 5xx aborts the probing
/// immediately instead of being reported as missing content.
pub async fn search_by_id(client: &AuthenticatedClient, id: &str) -> Result<SearchResult> {
    utils::validate_id(id)?;

    match artists::get_artist(client, id).await {
        Ok(artist) => return Ok(artist.into()),
        Err(e) if aborts_probe(&e) => return Err(e),
        Err(_) => {}
    }

    match albums::get_album(client, id).await {
        Ok(album) => return Ok(album.into()),
        Err(e) if aborts_probe(&e) => return Err(e),
        Err(_) => {}
    }

    match tracks::get_track(client, id).await {
        Ok(track) => Ok(track.into()),
        Err(e) if aborts_probe(&e) => Err(e),
        Err(_) => Err(Error::ContentNotFound(id.to_string())),
    }
}
