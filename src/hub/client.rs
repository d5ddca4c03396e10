// file: src/hub/client.rs
// description: dataset hub HTTP client for repo bootstrap and shard upload
// reference: https://huggingface.co/docs/hub/api

use crate::error::{PipelineError, Result};
use crate::hub::auth::CredentialProvider;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// The two hub operations the pipeline needs. Abstracted so the shard writer
/// and runner are testable without network access.
#[async_trait]
pub trait DatasetHub: Send + Sync {
    /// Ensure the destination dataset repository exists. Idempotent: an
    /// already-existing repository is success, not an error.
    async fn create_repo(&self, repo: &str) -> Result<()>;

    /// Upload one local file to the given path inside the repository.
    async fn upload_file(&self, repo: &str, path_in_repo: &str, local_path: &Path) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct WhoAmI {
    name: String,
}

pub struct HfHubClient {
    http: Client,
    endpoint: String,
    token: Option<String>,
}

impl HfHubClient {
    pub fn new(endpoint: impl Into<String>, credentials: &dyn CredentialProvider) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            token: credentials.token(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Validate the configured token against the hub and return the account
    /// name. Returns `Ok(None)` when running anonymously.
    pub async fn verify_token(&self) -> Result<Option<String>> {
        if self.token.is_none() {
            return Ok(None);
        }

        let url = format!("{}/api/whoami-v2", self.endpoint);
        let response = self.authorized(self.http.get(&url)).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(PipelineError::hub(status, message));
        }

        let who: WhoAmI = response.json().await?;
        debug!("Token verified for account {}", who.name);
        Ok(Some(who.name))
    }

    /// Check whether a dataset repository already exists on the hub.
    pub async fn repo_exists(&self, repo: &str) -> Result<bool> {
        let url = format!("{}/api/datasets/{}", self.endpoint, repo);
        let response = self.authorized(self.http.get(&url)).send().await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(PipelineError::hub(status.as_u16(), message))
            }
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl DatasetHub for HfHubClient {
    async fn create_repo(&self, repo: &str) -> Result<()> {
        let url = format!("{}/api/repos/create", self.endpoint);
        let body = serde_json::json!({
            "type": "dataset",
            "name": repo,
            "private": false,
        });

        let response = self
            .authorized(self.http.post(&url))
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                info!("Created dataset repository {}", repo);
                Ok(())
            }
            // the repository already exists; bootstrap is a no-op
            StatusCode::CONFLICT => {
                debug!("Dataset repository {} already exists", repo);
                Ok(())
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(PipelineError::hub(status.as_u16(), message))
            }
        }
    }

    async fn upload_file(&self, repo: &str, path_in_repo: &str, local_path: &Path) -> Result<()> {
        let bytes = std::fs::read(local_path)?;
        let encoded = BASE64.encode(&bytes);

        // NDJSON commit payload: one header line, one file line
        let header = serde_json::json!({
            "key": "header",
            "value": { "summary": format!("Upload {}", path_in_repo), "description": "" },
        });
        let file = serde_json::json!({
            "key": "file",
            "value": { "path": path_in_repo, "content": encoded, "encoding": "base64" },
        });
        let payload = format!("{}\n{}", header, file);

        let url = format!("{}/api/datasets/{}/commit/main", self.endpoint, repo);
        let response = self
            .authorized(self.http.post(&url))
            .header("Content-Type", "application/x-ndjson")
            .body(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(PipelineError::hub(status, message));
        }

        info!(
            "Uploaded {} ({} bytes) to {}",
            path_in_repo,
            bytes.len(),
            repo
        );
        Ok(())
    }
}

/// Hub that accepts everything and uploads nothing. Backs `--skip-upload`
/// runs where shards are only written locally.
pub struct NoopHub;

#[async_trait]
impl DatasetHub for NoopHub {
    async fn create_repo(&self, _repo: &str) -> Result<()> {
        Ok(())
    }

    async fn upload_file(&self, _repo: &str, path_in_repo: &str, _local_path: &Path) -> Result<()> {
        debug!("Skipping upload of {}", path_in_repo);
        Ok(())
    }
}
