use crate::{
    spotify::{SpotifyClient, SpotifyError},
    types::{PlaylistResponse, PlaylistSummary, TrackCandidate},
    utils,
};

/// Tracks listed per playlist.
pub const PLAYLIST_PREVIEW_TRACKS: usize = 5;

pub fn playlist_summary_from(playlist: PlaylistResponse) -> PlaylistSummary {
    let total_tracks = playlist
        .tracks
        .total
        .unwrap_or(playlist.tracks.items.len() as u64);

    let tracks = playlist
        .tracks
        .into_items()
        .into_iter()
        .filter_map(|item| item.track)
        .take(PLAYLIST_PREVIEW_TRACKS)
        .map(|track| {
            let artist = track
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default();
            TrackCandidate::new(track.name, artist)
                .with_image(utils::first_image_url(&track.album.images))
        })
        .collect();

    PlaylistSummary {
        name: playlist.name,
        owner: playlist
            .owner
            .display_name
            .unwrap_or_else(|| "Unknown".to_string()),
        description: playlist
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "No description".to_string()),
        total_tracks,
        tracks,
    }
}

impl SpotifyClient {
    pub async fn playlist(&self, playlist_id: &str) -> Result<PlaylistSummary, SpotifyError> {
        let path = format!("/playlists/{id}", id = playlist_id);
        let response: PlaylistResponse = self
            .get_json(&path, &[("market", self.market())])
            .await?;

        Ok(playlist_summary_from(response))
    }
}
