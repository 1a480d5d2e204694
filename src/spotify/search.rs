use async_trait::async_trait;

use crate::{
    Res,
    recommendation::TrackCatalog,
    spotify::{SpotifyClient, SpotifyError},
    types::{CatalogCategory, CatalogEntry, CatalogTrack, SearchResponse, TrackCandidate, TrackObject},
    utils,
};

/// Builds the structured query used to cross-reference a suggestion.
pub fn track_query(title: &str, artist: &str) -> String {
    format!("track:{} artist:{}", title.trim(), artist.trim())
}

/// Artists show at most this many genres on their card.
const GENRES_SHOWN: usize = 3;

pub fn catalog_track_from(track: TrackObject) -> CatalogTrack {
    CatalogTrack {
        artist: track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default(),
        image_url: utils::first_image_url(&track.album.images),
        title: track.name,
    }
}

/// Flattens a search response into tracks, then artists, then albums.
pub fn catalog_entries_from(response: SearchResponse) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    if let Some(tracks) = response.tracks {
        entries.extend(tracks.into_items().into_iter().map(|track| {
            let hit = catalog_track_from(track);
            CatalogEntry {
                category: CatalogCategory::Track,
                candidate: TrackCandidate::new(hit.title, hit.artist).with_image(hit.image_url),
            }
        }));
    }

    if let Some(artists) = response.artists {
        entries.extend(artists.into_items().into_iter().map(|artist| {
            let genres = if artist.genres.is_empty() {
                "Various genres".to_string()
            } else {
                artist
                    .genres
                    .iter()
                    .take(GENRES_SHOWN)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            CatalogEntry {
                category: CatalogCategory::Artist,
                candidate: TrackCandidate::new(artist.name, genres)
                    .with_image(utils::first_image_url(&artist.images)),
            }
        }));
    }

    if let Some(albums) = response.albums {
        entries.extend(albums.into_items().into_iter().map(|album| {
            let artist = album
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default();
            CatalogEntry {
                category: CatalogCategory::Album,
                candidate: TrackCandidate::new(album.name, artist)
                    .with_image(utils::first_image_url(&album.images)),
            }
        }));
    }

    entries
}

impl SpotifyClient {
    /// Looks up `track:<title> artist:<artist>` and returns only the first hit.
    pub async fn search_track(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<CatalogTrack>, SpotifyError> {
        let query = track_query(title, artist);
        let response: SearchResponse = self
            .get_json_once(
                "/search",
                &[
                    ("q", query.as_str()),
                    ("type", "track"),
                    ("limit", "1"),
                    ("market", self.market()),
                ],
            )
            .await?;

        Ok(response
            .tracks
            .and_then(|tracks| tracks.into_items().into_iter().next())
            .map(catalog_track_from))
    }

    /// Free-text search over tracks, artists and albums, `limit` of each.
    pub async fn search_catalog(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<CatalogEntry>, SpotifyError> {
        let limit = limit.to_string();
        let response: SearchResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.trim()),
                    ("type", "track,artist,album"),
                    ("limit", limit.as_str()),
                    ("market", self.market()),
                ],
            )
            .await?;

        Ok(catalog_entries_from(response))
    }
}

#[async_trait]
impl TrackCatalog for SpotifyClient {
    async fn lookup_track(&self, title: &str, artist: &str) -> Res<Option<CatalogTrack>> {
        Ok(self.search_track(title, artist).await?)
    }
}
