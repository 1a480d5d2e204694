use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// A song suggestion ready for display.
///
/// Title and artist are either the generated values or, after a catalog
/// match, the catalog's canonical ones. `image_url` is only ever set by a
/// catalog match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCandidate {
    pub title: String,
    pub artist: String,
    pub image_url: Option<String>,
}

impl TrackCandidate {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            image_url: None,
        }
    }

    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }
}

/// First hit of a structured catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTrack {
    pub title: String,
    pub artist: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    pub album: SimpleAlbum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistObject {
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumObject {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Spotify paging object. Search results occasionally contain `null` items,
/// which deserialize to `None` and are skipped by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
    pub total: Option<u64>,
}

impl<T> Paging<T> {
    pub fn into_items(self) -> Vec<T> {
        self.items.into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Paging<TrackObject>>,
    pub artists: Option<Paging<ArtistObject>>,
    pub albums: Option<Paging<AlbumObject>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReleasesResponse {
    pub albums: Paging<AlbumObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub name: String,
    pub owner: PlaylistOwner,
    pub description: Option<String>,
    pub tracks: Paging<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub country: Option<String>,
}

/// Kind of a catalog search hit, used as the card label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogCategory {
    Track,
    Artist,
    Album,
}

impl std::fmt::Display for CatalogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CatalogCategory::Track => "Track",
            CatalogCategory::Artist => "Artist",
            CatalogCategory::Album => "Album",
        };
        write!(f, "{}", label)
    }
}

/// One catalog search hit shaped like a recommendation card.
///
/// `candidate.artist` holds the secondary line: the artist name for tracks
/// and albums, the leading genres for artists.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub category: CatalogCategory,
    pub candidate: TrackCandidate,
}

#[derive(Debug, Clone)]
pub struct Release {
    pub name: String,
    pub artist: String,
    pub date: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlaylistSummary {
    pub name: String,
    pub owner: String,
    pub description: String,
    pub total_tracks: u64,
    pub tracks: Vec<TrackCandidate>,
}

#[derive(Tabled)]
pub struct RecommendationTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub grid: String,
    pub title: String,
    pub artist: String,
    pub cover: String,
}

#[derive(Tabled)]
pub struct CatalogTableRow {
    pub category: String,
    pub name: String,
    pub detail: String,
    pub cover: String,
}

#[derive(Tabled)]
pub struct ReleaseTableRow {
    pub date: String,
    pub name: String,
    pub artist: String,
    pub cover: String,
}

#[derive(Tabled)]
pub struct PlaylistTrackRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
    pub artist: String,
    pub cover: String,
}
