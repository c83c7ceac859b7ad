// Backend API client
//
// Thin async client for the two JSON endpoints the dashboard consumes:
//   GET /api/users                       -> { "users": [...] }
//   GET /api/users/{id}/ips?limit=N      -> { "ips": [...] }
// Non-2xx bodies are kept verbatim so the panel can show what the server
// said.

use crate::sighting::{SightingRecord, User};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Backend client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    #[serde(default)]
    users: Option<Vec<User>>,
}

#[derive(Debug, Deserialize)]
struct IpsEnvelope {
    #[serde(default)]
    ips: Option<Vec<SightingRecord>>,
}

/// Client for the sharing-watcher backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (trailing slashes are ignored)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn users_url(&self) -> String {
        format!("{}/api/users", self.base_url)
    }

    pub fn user_ips_url(&self, user_id: u64, limit: u32) -> String {
        format!("{}/api/users/{}/ips?limit={}", self.base_url, user_id, limit)
    }

    /// Fetch the user list
    pub async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        let envelope: UsersEnvelope = self.get_json(&self.users_url()).await?;
        Ok(envelope.users.unwrap_or_default())
    }

    /// Fetch up to `limit` IP sightings for one user
    pub async fn fetch_user_ips(
        &self,
        user_id: u64,
        limit: u32,
    ) -> Result<Vec<SightingRecord>, ApiError> {
        let envelope: IpsEnvelope = self.get_json(&self.user_ips_url(user_id, limit)).await?;
        Ok(envelope.ips.unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
