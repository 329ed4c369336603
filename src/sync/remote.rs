//! Remote vocabulary store over REST
//!
//! The backend exposes a PostgREST-style table at `/rest/v1/vocabulary`.
//! Auth is an API key sent both as the `apikey` header and as a bearer token.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::payload::WirePayload;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Authentication failed")]
    AuthFailed,
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Abstract remote replica of the vocabulary set
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create an entry on the remote; returns the backend id
    async fn create_entry(&self, payload: &WirePayload) -> Result<String, RemoteError>;

    /// Update an existing remote entry
    async fn update_entry(&self, backend_id: &str, payload: &WirePayload)
        -> Result<(), RemoteError>;

    /// Fetch entries updated after `since`; a full fetch when `since` is None
    async fn fetch_updated_since(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<WirePayload>, RemoteError>;
}

/// REST client for the vocabulary backend
pub struct RestRemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestRemoteStore {
    /// Create a new client for the given backend
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RemoteError> {
        // Normalize URL - ensure no trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(RemoteError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }
        if api_key.trim().is_empty() {
            return Err(RemoteError::AuthFailed);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .connect_timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/vocabulary", self.base_url)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RemoteError::AuthFailed),
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound(
                response.url().path().to_string(),
            )),
            status if !status.is_success() => Err(RemoteError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl RemoteStore for RestRemoteStore {
    async fn create_entry(&self, payload: &WirePayload) -> Result<String, RemoteError> {
        let response = self
            .apply_auth(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(payload)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        // PostgREST returns the created rows as an array
        let rows: Vec<WirePayload> = response.json().await?;
        rows.into_iter()
            .next()
            .and_then(|row| row.id)
            .ok_or_else(|| {
                RemoteError::UnexpectedResponse("create returned no row with an id".to_string())
            })
    }

    async fn update_entry(
        &self,
        backend_id: &str,
        payload: &WirePayload,
    ) -> Result<(), RemoteError> {
        let url = format!("{}?id=eq.{}", self.table_url(), backend_id);
        let response = self
            .apply_auth(self.client.patch(&url))
            .json(payload)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn fetch_updated_since(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<WirePayload>, RemoteError> {
        let url = match since {
            Some(ts) => format!(
                "{}?select=*&updated_at=gt.{}",
                self.table_url(),
                ts.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
            None => format!("{}?select=*", self.table_url()),
        };

        let response = self.apply_auth(self.client.get(&url)).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }
}
