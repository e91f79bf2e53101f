//! HTTP collection service client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CollectionServiceConfig;

use super::{
    CollectionClient, CollectionClientError, CollectionMetadata, CollectionPage, MoveProgress,
    MoveSelection,
};

/// HTTP implementation of [`CollectionClient`] backed by `reqwest`.
///
/// Stateless per call; a single instance may be shared across invocations
/// without synchronization.
pub struct HttpCollectionClient {
    client: Client,
    config: CollectionServiceConfig,
}

impl HttpCollectionClient {
    /// Create a new client for the configured service.
    pub fn new(config: CollectionServiceConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn map_request_error(e: reqwest::Error) -> CollectionClientError {
        if e.is_timeout() {
            CollectionClientError::Timeout
        } else {
            CollectionClientError::ConnectionFailed(e.to_string())
        }
    }

    /// Send a GET request and return the response body of a success status.
    /// Non-2xx responses surface their body text in the error.
    async fn get_text(&self, endpoint: &str) -> Result<String, CollectionClientError> {
        let url = format!("{}{}", self.base_url(), endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CollectionClientError::ConnectionFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(CollectionClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn parse<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, CollectionClientError> {
        serde_json::from_str(body)
            .map_err(|e| CollectionClientError::MalformedResponse(e.to_string()))
    }
}

/// Wire body of the submit request. The selection is flattened to the wire
/// convention here and nowhere else: an empty `company_ids` array means the
/// entire source collection.
#[derive(Debug, Serialize)]
struct SubmitMoveBody<'a> {
    source_collection_id: &'a str,
    target_collection_id: &'a str,
    company_ids: &'a [String],
}

/// Submit response. Some service builds spell the id `jobId`; both are
/// accepted, neither being present is a contract violation.
#[derive(Debug, Deserialize)]
struct SubmitMoveResponse {
    #[serde(default)]
    job_id: Option<String>,
    #[serde(default, rename = "jobId")]
    job_id_camel: Option<String>,
}

impl SubmitMoveResponse {
    fn into_job_id(self) -> Option<String> {
        self.job_id.or(self.job_id_camel)
    }
}

#[async_trait]
impl CollectionClient for HttpCollectionClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_collections(&self) -> Result<Vec<CollectionMetadata>, CollectionClientError> {
        let body = self.get_text("/collections").await?;
        Self::parse(&body)
    }

    async fn collection_page(
        &self,
        id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<CollectionPage, CollectionClientError> {
        let endpoint = format!("/collections/{}?offset={}&limit={}", id, offset, limit);
        let body = self.get_text(&endpoint).await?;
        Self::parse(&body)
    }

    async fn submit_move(
        &self,
        source_id: &str,
        target_id: &str,
        selection: &MoveSelection,
    ) -> Result<String, CollectionClientError> {
        let url = format!("{}/collections/add-companies", self.base_url());
        let body = SubmitMoveBody {
            source_collection_id: source_id,
            target_collection_id: target_id,
            company_ids: selection.wire_ids(),
        };

        debug!(
            source_id,
            target_id,
            companies = body.company_ids.len(),
            "submitting bulk move"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CollectionClientError::ConnectionFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(CollectionClientError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: SubmitMoveResponse = Self::parse(&text)?;
        parsed.into_job_id().ok_or_else(|| {
            CollectionClientError::MalformedResponse("submit response missing job_id".to_string())
        })
    }

    async fn move_progress(&self, job_id: &str) -> Result<MoveProgress, CollectionClientError> {
        let endpoint = format!("/collections/progress/{}", job_id);
        let body = self.get_text(&endpoint).await?;
        Self::parse(&body)
    }
}
