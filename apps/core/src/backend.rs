use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response body is not json: {0}")]
    Decode(String),
}

/// Raw access to the remote full-text index. Implementations return the
/// backend's JSON untouched; shaping it is the gateway's job.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, body: &Value) -> Result<Value, BackendError>;
    async fn fetch_source(&self, id: &str, includes: &[&str]) -> Result<Value, BackendError>;
}

pub struct HttpSearchBackend {
    client: Client,
    endpoint: Url,
    index: String,
}

impl HttpSearchBackend {
    pub fn new(
        endpoint: &str,
        index: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|error| BackendError::InvalidEndpoint(format!("{endpoint}: {error}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(BackendError::InvalidEndpoint(endpoint.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|error| BackendError::Transport(error.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            index: index.to_string(),
        })
    }

    pub fn search_url(&self) -> Result<Url, BackendError> {
        join_segments(&self.endpoint, &[self.index.as_str(), "_search"])
    }

    pub fn source_url(&self, id: &str, includes: &[&str]) -> Result<Url, BackendError> {
        let mut url = join_segments(&self.endpoint, &[self.index.as_str(), "_source", id])?;
        if !includes.is_empty() {
            url.query_pairs_mut()
                .append_pair("_source_includes", &includes.join(","));
        }
        Ok(url)
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, body: &Value) -> Result<Value, BackendError> {
        let url = self.search_url()?;
        tracing::debug!(%url, "posting search request");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|error| BackendError::Transport(error.to_string()))?;
        read_json(response).await
    }

    async fn fetch_source(&self, id: &str, includes: &[&str]) -> Result<Value, BackendError> {
        let url = self.source_url(id, includes)?;
        tracing::debug!(%url, "fetching document source");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| BackendError::Transport(error.to_string()))?;
        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|error| BackendError::Decode(error.to_string()))
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, BackendError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| BackendError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
