use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::models::{Correlations, Match};
use super::source::StatsSource;

/// Failure of a single backend request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("match {0} not found")]
    NotFound(i64),
}

/// HTTP client for the Birbucuk statistics API.
#[derive(Clone)]
pub struct StatsClient {
    http: Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(StatsClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                endpoint: path.to_string(),
                source,
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                endpoint: path.to_string(),
                status,
                body,
            });
        }

        resp.json::<T>().await.map_err(|source| FetchError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl StatsSource for StatsClient {
    fn name(&self) -> &str {
        "birbucuk-api"
    }

    async fn list_matches(&self, limit: u32) -> Result<Vec<Match>, FetchError> {
        self.get_json(&format!("/matches?limit={}", limit)).await
    }

    async fn correlations(&self) -> Result<Correlations, FetchError> {
        self.get_json("/stats/correlations").await
    }

    async fn get_match(&self, id: i64) -> Result<Match, FetchError> {
        match self.get_json(&format!("/matches/{}", id)).await {
            Err(FetchError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(FetchError::NotFound(id))
            }
            other => other,
        }
    }
}
