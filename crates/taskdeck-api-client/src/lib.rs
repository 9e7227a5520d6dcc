//! HTTP client for the Taskdeck API.
//!
//! Generic GET/POST/PATCH/PUT/DELETE helpers, typed task and upload methods, and
//! the client side of the direct-to-storage upload flow. The CLI uses this client
//! directly.

pub mod api;
pub mod upload;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:4000";

/// Route prefix of the versioned API this client speaks.
pub const API_PREFIX: &str = "/api/v0";

/// HTTP client for the Taskdeck API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: TASKDECK_API_URL (or API_URL).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("TASKDECK_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.context("Failed to send request")?;
        parse_json(ensure_success(response).await?).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.build_url(path))
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        parse_json(ensure_success(response).await?).await
    }

    /// PATCH JSON body to an endpoint that answers 204.
    pub async fn patch_json<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let response = self
            .client
            .patch(self.build_url(path))
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        ensure_success(response).await.map(drop)
    }

    /// PUT JSON body to an endpoint that answers 204.
    pub async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let response = self
            .client
            .put(self.build_url(path))
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        ensure_success(response).await.map(drop)
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.build_url(path))
            .send()
            .await
            .context("Failed to send request")?;

        ensure_success(response).await.map(drop)
    }

    /// Raw client, e.g. for requests to pre-signed storage URLs.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Turn a non-2xx response into an error carrying the status and body.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(anyhow::anyhow!(
        "API request failed with status {}: {}",
        status,
        error_text
    ))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .context("Failed to parse response as JSON")
}

pub use taskdeck_core::models::{
    ConfirmUploadRequest, ConfirmUploadResponse, CreateTaskRequest, Task, TaskListResponse,
    TaskStatus, UploadCredential, UploadState,
};
pub use upload::{ImageUpload, UploadFlowError};
