//! Upstream stats provider access.
//!
//! The [`MatchSource`] trait is the seam between the refresh controller and
//! the provider. [`HenrikClient`] talks to the HenrikDev Valorant API; every
//! failure is returned as a typed [`FetchError`] and it is up to the caller
//! to degrade. Nothing here retries or sleeps between players.

mod payload;

pub use payload::{parse_match_list, parse_rank};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::UpstreamConfig;
use crate::models::{MatchRecord, Player, RankInfo};

/// Errors that can occur while talking to the provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid API key: {0}")]
    InvalidCredential(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Provider of rank and match history for a single player.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    async fn fetch_rank(&self, player: &Player) -> Result<RankInfo, FetchError>;

    /// Most recent matches first, at most `size` of them.
    async fn fetch_matches(
        &self,
        player: &Player,
        size: u32,
    ) -> Result<Vec<MatchRecord>, FetchError>;
}

/// HenrikDev API client.
pub struct HenrikClient {
    client: Client,
    base_url: Url,
    region: String,
    mode_filter: Option<String>,
    timeout: Duration,
}

impl HenrikClient {
    pub fn new(
        config: &UpstreamConfig,
        region: impl Into<String>,
        api_key: &str,
    ) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(config.base_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("roster-stats/", env!("CARGO_PKG_VERSION"))),
        );
        let mut auth = HeaderValue::from_str(api_key)
            .map_err(|_| FetchError::InvalidCredential("not a valid header value".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            region: region.into(),
            mode_filter: config.mode_filter.clone(),
            timeout,
        })
    }

    /// Build an endpoint URL. Each segment is percent-encoded, so names
    /// with spaces or `#` are safe.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn matches_url(&self, player: &Player, size: u32) -> Result<Url, FetchError> {
        let mut url = self.endpoint(&[
            "valorant",
            "v3",
            "matches",
            self.region.as_str(),
            player.name.as_str(),
            player.tag.as_str(),
        ])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("size", &size.to_string());
            if let Some(mode) = &self.mode_filter {
                query.append_pair("mode", mode);
            }
        }
        Ok(url)
    }

    fn rank_url(&self, player: &Player) -> Result<Url, FetchError> {
        self.endpoint(&[
            "valorant",
            "v2",
            "mmr",
            self.region.as_str(),
            player.name.as_str(),
            player.tag.as_str(),
        ])
    }

    async fn get_json(&self, url: Url) -> Result<Value, FetchError> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Http(e)
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(FetchError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Malformed(e.to_string())
            }
        })
    }
}

#[async_trait]
impl MatchSource for HenrikClient {
    fn name(&self) -> &'static str {
        "henrikdev"
    }

    async fn fetch_rank(&self, player: &Player) -> Result<RankInfo, FetchError> {
        let body = self.get_json(self.rank_url(player)?).await?;
        parse_rank(&body).ok_or_else(|| FetchError::Malformed("rank response without data".into()))
    }

    async fn fetch_matches(
        &self,
        player: &Player,
        size: u32,
    ) -> Result<Vec<MatchRecord>, FetchError> {
        let body = self.get_json(self.matches_url(player, size)?).await?;
        parse_match_list(&body)
            .ok_or_else(|| FetchError::Malformed("match response without data array".into()))
    }
}

#[cfg(test)]
pub use mock::MockSource;
