use crate::{error::Result, spotify::client::AuthenticatedClient, types::Track, utils};

pub async fn get_track(client: &AuthenticatedClient, id: &str) -> Result<Track> {
    client
        .get_json(&format!("/tracks/{}", utils::validate_id(id)?), &[])
        .await
}

pub async fn is_saved(client: &AuthenticatedClient, id: &str) -> Result<bool> {
    let saved: Vec<bool> = client
        .get_json("/me/tracks/contains", &[("ids", id)])
        .await?;
    Ok(saved.first().copied().unwrap_or(false))
}

pub async fn save(client: &AuthenticatedClient, id: &str) -> Result<()> {
    client.put("/me/tracks", &[("ids", id)]).await
}
