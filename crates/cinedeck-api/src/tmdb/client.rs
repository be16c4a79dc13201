//! `MediaClient` - TMDB fetch client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::MediaApi;
use super::error::{FetchError, redact_api_key};
use super::rate_limiter::RateLimiter;
use super::request::{EndpointKind, MediaType, RequestDescriptor};
use super::types::{
    Credits, GenreList, MediaDetail, MediaImages, MediaListResult, Reviews, TmdbErrorResponse,
};
use super::url_builder::{DEFAULT_BASE_PATH, UrlBuilder};

/// TMDB fetch client.
///
/// Performs exactly one GET per call: no retries and no internal
/// timeout. Callers that want either wrap the returned future.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MediaClient {
    /// HTTP client.
    http_client: Client,
    /// Request URL builder (base path + API key).
    urls: UrlBuilder,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

/// Builder for `MediaClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MediaClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl MediaClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the API root (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `base_url` is not an absolute URL.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<MediaClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;
        let base_path = self
            .base_url
            .unwrap_or_else(|| String::from(DEFAULT_BASE_PATH));
        Url::parse(&base_path).with_context(|| format!("invalid base_url: {base_path}"))?;

        let rate_limiter = self
            .min_interval
            .map_or_else(RateLimiter::default_interval, RateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(MediaClient {
            http_client,
            urls: UrlBuilder::new(base_path, api_key),
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl MediaClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> MediaClientBuilder {
        MediaClientBuilder::new()
    }

    /// URL builder bound to this client's base path and key.
    #[must_use]
    pub const fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// GETs `url` and parses the body as untyped JSON.
    ///
    /// # Errors
    ///
    /// - `FetchError::Transport` on network failure or non-2xx status.
    /// - `FetchError::Decode` if the body is not valid JSON.
    #[instrument(skip_all)]
    pub async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        self.request_json(url).await
    }

    /// Builds the URL for `descriptor`, GETs it and decodes into `T`.
    ///
    /// # Errors
    ///
    /// - `FetchError::Transport` on network failure or non-2xx status.
    /// - `FetchError::Decode` if the body does not decode into `T`.
    #[instrument(skip_all, fields(endpoint = ?descriptor.endpoint, id = ?descriptor.id))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<T, FetchError> {
        let url = self.urls.build(descriptor);
        self.request_json(&url).await
    }

    /// Sends one rate-limited GET and decodes the JSON body.
    async fn request_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.rate_limiter.lock().await.acquire().await;

        let redacted = redact_api_key(url);
        tracing::debug!(url = %redacted, "TMDB API request");

        let transport = |status: Option<u16>, message: String| FetchError::Transport {
            url: redacted.clone(),
            status,
            message,
        };

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| transport(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = serde_json::from_str::<TmdbErrorResponse>(&body).map_or(
                body,
                |error_response| {
                    format!(
                        "code={}, message={}",
                        error_response.status_code, error_response.status_message
                    )
                },
            );
            tracing::debug!(url = %redacted, status = status.as_u16(), "TMDB API error response");
            return Err(transport(Some(status.as_u16()), message));
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport(Some(status.as_u16()), e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: redacted.clone(),
            message: e.to_string(),
        })
    }
}

impl MediaApi for MediaClient {
    #[instrument(skip_all)]
    async fn list(&self, descriptor: &RequestDescriptor) -> Result<MediaListResult, FetchError> {
        self.get_json(descriptor).await
    }

    #[instrument(skip_all, fields(id = id, media_type = %media_type))]
    async fn details(
        &self,
        media_type: MediaType,
        id: u64,
        original_language: Option<&str>,
    ) -> Result<MediaDetail, FetchError> {
        let descriptor =
            RequestDescriptor::secondary(EndpointKind::Details, media_type, id, original_language);
        self.get_json(&descriptor).await
    }

    #[instrument(skip_all, fields(id = id, media_type = %media_type))]
    async fn images(
        &self,
        media_type: MediaType,
        id: u64,
        original_language: Option<&str>,
    ) -> Result<MediaImages, FetchError> {
        let descriptor =
            RequestDescriptor::secondary(EndpointKind::Images, media_type, id, original_language);
        self.get_json(&descriptor).await
    }

    #[instrument(skip_all, fields(id = id, media_type = %media_type))]
    async fn credits(&self, media_type: MediaType, id: u64) -> Result<Credits, FetchError> {
        let descriptor = RequestDescriptor::secondary(EndpointKind::Credits, media_type, id, None);
        self.get_json(&descriptor).await
    }

    #[instrument(skip_all, fields(id = id, media_type = %media_type))]
    async fn reviews(&self, media_type: MediaType, id: u64) -> Result<Reviews, FetchError> {
        let descriptor = RequestDescriptor::secondary(EndpointKind::Reviews, media_type, id, None);
        self.get_json(&descriptor).await
    }

    #[instrument(skip_all)]
    async fn search_multi(&self, query: &str) -> Result<MediaListResult, FetchError> {
        let url = self.urls.search_multi_url(query);
        self.request_json(&url).await
    }

    #[instrument(skip_all)]
    async fn genre_list(&self, media_type: MediaType) -> Result<GenreList, FetchError> {
        let url = self.urls.genre_list_url(media_type);
        self.request_json(&url).await
    }
}
