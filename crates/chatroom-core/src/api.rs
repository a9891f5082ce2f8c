//! HTTP client for the chat backend.
//!
//! Every call maps to one backend route. Non-2xx responses become an
//! [`ApiError`] carrying the status and the server's `detail`, so callers can
//! show a readable message.

use std::fmt;

use anyhow::{Context, Result};
use chatroom_types::{
    AckResponse, BatchDeleteRequest, DeletedHistoryResponse, DeletedKey, DeletedMessage,
    ErrorResponse, HourlyTrendResponse, RestoreRequest, SearchResponse,
    SessionsResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;

const USER_AGENT: &str = concat!("chatroom/", env!("CARGO_PKG_VERSION"));

/// Error returned when the backend answers with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub detail: Option<String>,
}

impl ApiError {
    fn from_body(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|err| err.detail_text())
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            });
        Self { status, detail }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "HTTP {}: {}", self.status, detail),
            None => write!(f, "HTTP {}", self.status),
        }
    }
}

impl std::error::Error for ApiError {}

/// Chat backend client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    /// Builds a client from the configured base URL and timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.api_base_url)
            .with_context(|| format!("Invalid API base URL '{}'", config.api_base_url))?;
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // ------------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------------

    pub async fn list_sessions(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["sessions"])?;
        let body: SessionsResponse = self.get_json(url).await.context("list sessions")?;
        Ok(body.sessions)
    }

    pub async fn create_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&["sessions", session_id])?;
        let response = self.http.post(url).send().await;
        let _: AckResponse = Self::read_json(response)
            .await
            .with_context(|| format!("create session '{session_id}'"))?;
        Ok(())
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&["sessions", session_id])?;
        let response = self.http.delete(url).send().await;
        let _: AckResponse = Self::read_json(response)
            .await
            .with_context(|| format!("delete session '{session_id}'"))?;
        Ok(())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        let mut url = self.endpoint(&["search_messages"])?;
        url.query_pairs_mut().append_pair("query", query);
        let body: SearchResponse = self
            .get_json(url)
            .await
            .with_context(|| format!("search '{query}'"))?;
        Ok(body.session_ids)
    }

    // ------------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------------

    pub async fn deleted_history(&self, session_id: &str) -> Result<Vec<DeletedMessage>> {
        let url = self.endpoint(&["messages", "deleted_history", session_id])?;
        let body: DeletedHistoryResponse = self
            .get_json(url)
            .await
            .with_context(|| format!("load deleted history for '{session_id}'"))?;
        Ok(body.deleted_messages)
    }

    pub async fn batch_delete(&self, session_id: &str, ts_list: &[i64]) -> Result<String> {
        let url = self.endpoint(&["messages", "batch_delete"])?;
        let request = BatchDeleteRequest {
            session_id: session_id.to_string(),
            ts_list: ts_list.to_vec(),
        };
        let ack: AckResponse = self
            .post_json(url, &request)
            .await
            .with_context(|| format!("delete {} messages", ts_list.len()))?;
        Ok(ack.msg)
    }

    pub async fn restore(&self, session_id: &str, key: DeletedKey) -> Result<()> {
        let url = self.endpoint(&["messages", "restore"])?;
        let request = RestoreRequest::for_entry(session_id, key);
        let _: AckResponse = self
            .post_json(url, &request)
            .await
            .with_context(|| format!("restore message {key}"))?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Analytics
    // ------------------------------------------------------------------------

    /// Fetches the hourly message counts, sorted by time slot. The backend's
    /// `message` (sent when a session has no activity) is passed through.
    pub async fn hourly_trend(&self, session_id: &str) -> Result<HourlyTrendResponse> {
        let url = self.endpoint(&["aggregation", "hourly_trend", session_id])?;
        let mut body: HourlyTrendResponse = self
            .get_json(url)
            .await
            .with_context(|| format!("load hourly trend for '{session_id}'"))?;
        body.hourly_trend.sort_by(|a, b| a.time_slot.cmp(&b.time_slot));
        Ok(body)
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("API base URL cannot be a base: {}", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.http.get(url).send().await;
        Self::read_json(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: Url, body: &B) -> Result<T> {
        let response = self.http.post(url).json(body).send().await;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Result<reqwest::Response>,
    ) -> Result<T> {
        let response = response.context("request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_body(status.as_u16(), &body).into());
        }
        let bytes = response.bytes().await.context("read response body")?;
        serde_json::from_slice(&bytes).context("decode response body")
    }
}
