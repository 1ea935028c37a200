use crate::{
    error::Result,
    spotify::{albums, artists, client::AuthenticatedClient, tracks},
    types::{ContentKind, LikeResult, SearchResult},
    utils,
};

async fn is_liked(client: &AuthenticatedClient, kind: ContentKind, id: &str) -> Result<bool> {
    match kind {
        ContentKind::Artist => artists::is_following(client, id).await,
        ContentKind::Album => albums::is_saved(client, id).await,
        ContentKind::Track => tracks::is_saved(client, id).await,
    }
}

async fn like(client: &AuthenticatedClient, kind: ContentKind, id: &str) -> Result<()> {
    match kind {
        ContentKind::Artist => artists::follow(client, id).await,
        ContentKind::Album => albums::save(client, id).await,
        ContentKind::Track => tracks::save(client, id).await,
    }
}

/// Likes one entity. Without `force` an already liked entity is skipped and
/// no write is issued. Failures are recorded on the result, never returned.
async fn like_entity(client: &AuthenticatedClient, entity: SearchResult, force: bool) -> LikeResult {
    let mut result = LikeResult::new(entity);

    if !force {
        match is_liked(client, result.kind, &result.id).await {
            Ok(true) => {
                result.skipped = true;
                return result;
            }
            Ok(false) => {}
            Err(e) => {
                result.error = Some(e);
                return result;
            }
        }
    }

    if let Err(e) = like(client, result.kind, &result.id).await {
        result.error = Some(e);
    }
    result
}

async fn like_each(
    client: &AuthenticatedClient,
    entities: Vec<SearchResult>,
    force: bool,
) -> Vec<LikeResult> {
    let mut results = Vec::with_capacity(entities.len());
    for entity in entities {
        results.push(like_entity(client, entity, force).await);
    }
    results
}

/// Follows an artist.
pub async fn like_artist_by_id(
    client: &AuthenticatedClient,
    id: &str,
    force: bool,
) -> Result<Vec<LikeResult>> {
    let artist = artists::get_artist(client, id).await?;
    Ok(vec![like_entity(client, artist.into(), force).await])
}

/// Saves an album to the library.
pub async fn like_album_by_id(
    client: &AuthenticatedClient,
    id: &str,
    force: bool,
) -> Result<Vec<LikeResult>> {
    let album = albums::get_album(client, id).await?;
    Ok(vec![like_entity(client, album.into(), force).await])
}

/// Saves a track to the library.
pub async fn like_track_by_id(
    client: &AuthenticatedClient,
    id: &str,
    force: bool,
) -> Result<Vec<LikeResult>> {
    let track = tracks::get_track(client, id).await?;
    Ok(vec![like_entity(client, track.into(), force).await])
}

/// Saves every album of an artist, oldest release first.
///
/// Only resolving the artist or listing its albums can fail the whole call;
/// each album's own failure is reported on its result.
pub async fn like_albums_by_artist(
    client: &AuthenticatedClient,
    artist_id: &str,
    force: bool,
) -> Result<Vec<LikeResult>> {
    artists::get_artist(client, artist_id).await?;
    let mut albums = artists::get_artist_albums(client, artist_id).await?;
    utils::sort_albums_by_release_date(&mut albums);

    let entities = albums.into_iter().map(SearchResult::from).collect();
    Ok(like_each(client, entities, force).await)
}

/// Saves every track of an album in track-list order.
pub async fn like_tracks_by_album(
    client: &AuthenticatedClient,
    album_id: &str,
    force: bool,
) -> Result<Vec<LikeResult>> {
    albums::get_album(client, album_id).await?;
    let tracks = albums::get_album_tracks(client, album_id).await?;

    let entities = tracks.into_iter().map(SearchResult::from).collect();
    Ok(like_each(client, entities, force).await)
}
