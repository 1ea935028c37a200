use crate::{
    error::Result,
    spotify::client::AuthenticatedClient,
    types::{Album, Artist},
    utils,
};

/// Looks up a single artist by Spotify ID.
pub async fn get_artist(client: &AuthenticatedClient, id: &str) -> Result<Artist> {
    client
        .get_json(&format!("/artists/{}", utils::validate_id(id)?), &[])
        .await
}

/// Retrieves every album and single released by an artist, in provider order.
///
/// Follows the paging `next` links until the discography is exhausted, so the
/// result may take several requests for prolific artists.
pub async fn get_artist_albums(client: &AuthenticatedClient, id: &str) -> Result<Vec<Album>> {
    client
        .get_all(
            &format!("/artists/{}/albums", utils::validate_id(id)?),
            &[("include_groups", "album,single"), ("limit", "50")],
        )
        .await
}

/// Whether the current user follows the artist. An empty answer counts as
/// not following.
pub async fn is_following(client: &AuthenticatedClient, id: &str) -> Result<bool> {
    let following: Vec<bool> = client
        .get_json("/me/following/contains", &[("type", "artist"), ("ids", id)])
        .await?;
    Ok(following.first().copied().unwrap_or(false))
}

pub async fn follow(client: &AuthenticatedClient, id: &str) -> Result<()> {
    client
        .put("/me/following", &[("type", "artist"), ("ids", id)])
        .await
}
