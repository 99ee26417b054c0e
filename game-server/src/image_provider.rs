use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to image provider failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Image provider reported status '{0}'")]
    UnexpectedStatus(String),
}

/// Source of random dog images. Each call is one request; callers never
/// retry.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn random_image(&self) -> Result<String, FetchError>;
}

#[derive(Debug, Deserialize)]
struct RandomImageResponse {
    message: String,
    status: String,
}

/// Client for the dog.ceo random image API.
pub struct DogApiProvider {
    client: Client,
    endpoint: String,
}

impl DogApiProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageProvider for DogApiProvider {
    async fn random_image(&self) -> Result<String, FetchError> {
        tracing::debug!("Requesting random image from {}", self.endpoint);

        let response: RandomImageResponse = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "success" {
            return Err(FetchError::UnexpectedStatus(response.status));
        }

        Ok(response.message)
    }
}
