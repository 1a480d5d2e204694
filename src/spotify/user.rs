use crate::{
    spotify::{SpotifyClient, SpotifyError},
    types::CurrentUser,
};

impl SpotifyClient {
    /// Profile of the authenticated user; `country` drives market detection.
    pub async fn current_user(&self) -> Result<CurrentUser, SpotifyError> {
        self.get_json("/me", &[]).await
    }
}
