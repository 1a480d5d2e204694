use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    config,
    gemini::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse},
    recommendation::{GenerationError, MAX_CANDIDATES, SongGenerator},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the prompt sent for `keyword`.
pub fn build_prompt(keyword: &str) -> String {
    format!(
        "Based on the keyword \"{keyword}\", recommend exactly {count} songs that match the mood or genre.\n\
         Format each recommendation strictly as: \"Song Title - Artist Name\".\n\
         Only recommend songs that are available on Spotify.\n\
         Return only the recommendations, no additional text or explanations.",
        keyword = keyword,
        count = MAX_CANDIDATES
    )
}

pub struct GeminiClient {
    http: Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_url: String, model: String, api_key: String) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            model: model.trim_start_matches("models/").to_string(),
            api_key,
        })
    }

    /// Builds a client from `GEMINI_API_KEY`, `GEMINI_API_URL` and `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self, String> {
        Self::new(
            config::gemini_api_url(),
            config::gemini_model(),
            config::gemini_api_key()?,
        )
        .map_err(|e| e.to_string())
    }

    fn endpoint(&self) -> String {
        format!(
            "{uri}/models/{model}:generateContent",
            uri = self.api_url,
            model = self.model
        )
    }

    pub async fn generate(&self, prompt: String) -> Result<String, GenerationError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let json = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        Ok(json.text().trim().to_string())
    }
}

#[async_trait]
impl SongGenerator for GeminiClient {
    async fn suggest(&self, keyword: &str) -> Result<String, GenerationError> {
        self.generate(build_prompt(keyword)).await
    }
}

/// Maps a non-2xx response to the matching [`GenerationError`].
fn classify_failure(status: StatusCode, body: &str) -> GenerationError {
    let (message, api_status) = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => (
            parsed.error.message.unwrap_or_else(|| status.to_string()),
            parsed.error.status.unwrap_or_default(),
        ),
        Err(_) if body.trim().is_empty() => (status.to_string(), String::new()),
        Err(_) => (body.trim().to_string(), String::new()),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => GenerationError::Quota(message),
        StatusCode::BAD_REQUEST if message.contains("API key") || api_status == "UNAUTHENTICATED" => {
            GenerationError::Auth(message)
        }
        _ if api_status == "RESOURCE_EXHAUSTED" => GenerationError::Quota(message),
        _ => GenerationError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}
