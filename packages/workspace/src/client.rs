//! HTTP client for the publish endpoint, used by editors running outside
//! the server process.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use siteforge_editor::{EditorError, Publisher};

#[derive(Debug, Deserialize)]
struct PublishResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone)]
pub struct PublishClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl PublishClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl Publisher for PublishClient {
    async fn publish(&self, site_id: &str) -> Result<String, EditorError> {
        let response = self
            .http
            .post(format!("{}/sites/{}/publish", self.base_url, site_id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| EditorError::Publish(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: PublishResponse = response
                .json()
                .await
                .map_err(|e| EditorError::Publish(e.to_string()))?;
            return Ok(body.url);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => EditorError::Unauthenticated,
            StatusCode::NOT_FOUND => EditorError::NotFound(message),
            _ => EditorError::Publish(message),
        })
    }
}
