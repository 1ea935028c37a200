use std::time::Duration;

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    cli::auth::authenticated_client,
    error,
    spotify::like,
    success,
    types::{LikeResult, LikeTableRow},
    warning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LikeTarget {
    /// Follow an artist
    Artist,
    /// Save an album
    Album,
    /// Save a track
    Track,
    /// Save every album of an artist
    ArtistAlbums,
    /// Save every track of an album
    AlbumTracks,
}

fn to_row(result: &LikeResult) -> LikeTableRow {
    let status = match (&result.error, result.skipped) {
        (Some(e), _) => format!("failed: {}", e),
        (None, true) => "already liked".to_string(),
        (None, false) => "liked".to_string(),
    };

    LikeTableRow {
        kind: result.kind.to_string(),
        name: result.name.clone(),
        artists: result.artists.join(", "),
        status,
    }
}

pub async fn like(target: LikeTarget, id: String, force: bool) {
    let client = authenticated_client().await;

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Liking {}...", id));
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let results = match target {
        LikeTarget::Artist => like::like_artist_by_id(&client, &id, force).await,
        LikeTarget::Album => like::like_album_by_id(&client, &id, force).await,
        LikeTarget::Track => like::like_track_by_id(&client, &id, force).await,
        LikeTarget::ArtistAlbums => like::like_albums_by_artist(&client, &id, force).await,
        LikeTarget::AlbumTracks => like::like_tracks_by_album(&client, &id, force).await,
    };
    pb.finish_and_clear();

    let results = match results {
        Ok(results) => results,
        Err(e) => error!("Cannot like {}. Err: {}", id, e),
    };

    let rows: Vec<LikeTableRow> = results.iter().map(to_row).collect();
    println!("{}", Table::new(rows));

    let liked = results.iter().filter(|r| r.is_liked()).count();
    let skipped = results.iter().filter(|r| r.skipped).count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();

    if failed > 0 {
        warning!("Liked {}, skipped {}, failed {}.", liked, skipped, failed);
    } else {
        success!("Liked {}, skipped {}.", liked, skipped);
    }
}
