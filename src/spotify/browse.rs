use crate::{
    spotify::{SpotifyClient, SpotifyError},
    types::{NewReleasesResponse, Release},
    utils,
};

impl SpotifyClient {
    /// Newest album releases in the client's market.
    pub async fn new_releases(&self, limit: u32) -> Result<Vec<Release>, SpotifyError> {
        let limit = limit.to_string();
        let response: NewReleasesResponse = self
            .get_json(
                "/browse/new-releases",
                &[("limit", limit.as_str()), ("country", self.market())],
            )
            .await?;

        Ok(response
            .albums
            .into_items()
            .into_iter()
            .map(|album| Release {
                artist: album
                    .artists
                    .first()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
                image_url: utils::first_image_url(&album.images),
                date: album.release_date,
                name: album.name,
            })
            .collect())
    }
}
