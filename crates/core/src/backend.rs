use crate::config::{ClientConfig, API_KEY_HEADER};
use crate::error::Result;
use crate::traits::{FeedbackBackend, SearchBackend};
use crate::{FeedbackError, FeedbackEvent, SearchError, SearchRequest, SearchResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Talks to the resume search service over HTTP. No timeout is configured; requests
/// rely on the transport's own behavior.
#[derive(Clone)]
pub struct HttpBackend {
    client: Arc<Client>,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Arc::new(Client::new()),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let url = self.config.endpoint("search")?;
        let mut builder = self.client.post(url).json(request);
        if let Some(key) = self.config.api_key() {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let detail = body
                .pointer("/detail")
                .and_then(Value::as_str)
                .map(str::to_string);
            return Err(SearchError::BackendResponse {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response.bytes().await?;
        let results: Vec<SearchResult> = serde_json::from_slice(&bytes)?;
        debug!(count = results.len(), top_k = request.top_k, "search response decoded");
        Ok(results)
    }
}

#[async_trait]
impl FeedbackBackend for HttpBackend {
    async fn send_feedback(&self, event: &FeedbackEvent) -> Result<(), FeedbackError> {
        let url = self.config.endpoint("feedback")?;
        let response = self.client.post(url).json(event).send().await?;

        if !response.status().is_success() {
            return Err(FeedbackError::BackendResponse {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}
