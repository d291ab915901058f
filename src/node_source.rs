// Upstream document store: one GET per request for all of a user's nodes.
// No retry or caching here; failures surface to the caller as SourceError.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::SourceConfig;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid source url: {0}")]
    Url(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("upstream body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Supplies the raw node tree for one user. `null` means no data.
#[async_trait]
pub trait NodeSource: Send + Sync {
    async fn fetch_nodes(&self, user: &str) -> Result<Value, SourceError>;
}

/// Firebase Realtime Database REST source: `{base}/Users/{user}/Farm/Nodes.json`.
pub struct FirebaseSource {
    base_url: Url,
    client: reqwest::Client,
}

impl FirebaseSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| SourceError::Url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::Url(format!(
                "{} cannot be used as a base url",
                config.base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { base_url, client })
    }

    /// Node tree URL for `user`; the id is percent-encoded as a single path segment.
    pub fn nodes_url(&self, user: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::Url(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["Users", user, "Farm", "Nodes.json"]);
        Ok(url)
    }
}

#[async_trait]
impl NodeSource for FirebaseSource {
    #[instrument(skip(self), fields(source = "firebase"))]
    async fn fetch_nodes(&self, user: &str) -> Result<Value, SourceError> {
        let url = self.nodes_url(user)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "upstream rejected node fetch");
            return Err(SourceError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        let nodes: Value = serde_json::from_slice(&body)?;
        debug!(bytes = body.len(), "fetched node tree");
        Ok(nodes)
    }
}
