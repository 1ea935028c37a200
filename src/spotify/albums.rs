use crate::{
    error::Result,
    spotify::client::AuthenticatedClient,
    types::{Album, Track},
    utils,
};

pub async fn get_album(client: &AuthenticatedClient, id: &str) -> Result<Album> {
    client
        .get_json(&format!("/albums/{}", utils::validate_id(id)?), &[])
        .await
}

/// All tracks of an album in track-list order.
pub async fn get_album_tracks(client: &AuthenticatedClient, id: &str) -> Result<Vec<Track>> {
    client
        .get_all(
            &format!("/albums/{}/tracks", utils::validate_id(id)?),
            &[("limit", "50")],
        )
        .await
}

pub async fn is_saved(client: &AuthenticatedClient, id: &str) -> Result<bool> {
    let saved: Vec<bool> = client
        .get_json("/me/albums/contains", &[("ids", id)])
        .await?;
    Ok(saved.first().copied().unwrap_or(false))
}

pub async fn save(client: &AuthenticatedClient, id: &str) -> Result<()> {
    client.put("/me/albums", &[("ids", id)]).await
}
