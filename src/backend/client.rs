//! HTTP client for the assistant backend (`POST /query`, `GET /status`).

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{IndexStatus, QueryRequest, QueryResponse};
use crate::config::BackendConfig;
use crate::error::BackendError;

/// Talks to the external query/indexing service.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    config: BackendConfig,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build configured HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });
        Self { client, config }
    }

    /// Ask a question.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, BackendError> {
        debug!(query = %request.query, "Sending query");
        let endpoint = "/query";
        let resp = self
            .client
            .post(self.url(endpoint))
            .json(request)
            .send()
            .await
            .map_err(|source| BackendError::RequestFailed {
                endpoint: endpoint.to_string(),
                source,
            })?;
        decode(endpoint, resp).await
    }

    /// Index and ingestion status.
    pub async fn status(&self) -> Result<IndexStatus, BackendError> {
        let endpoint = "/status";
        let resp = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|source| BackendError::RequestFailed {
                endpoint: endpoint.to_string(),
                source,
            })?;
        decode(endpoint, resp).await
    }

    /// Where a cited source document can be opened.
    pub fn source_url(&self, filename: &str) -> String {
        format!(
            "{}{}{}",
            self.config.base_url, self.config.source_prefix, filename
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

/// Check content type and status, then decode the JSON body.
///
/// Error bodies are expected to look like `{"error": "..."}`.
async fn decode<T: DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<T, BackendError> {
    let status = resp.status();
    let is_json = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let body = resp
        .text()
        .await
        .map_err(|source| BackendError::RequestFailed {
            endpoint: endpoint.to_string(),
            source,
        })?;

    if !is_json {
        return Err(BackendError::NotJson {
            endpoint: endpoint.to_string(),
            body,
        });
    }

    let value: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| BackendError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

    if !status.is_success() {
        let message = value
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        return Err(BackendError::Status {
            endpoint: endpoint.to_string(),
            status,
            message,
        });
    }

    serde_json::from_value(value).map_err(|e| BackendError::InvalidResponse {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}
