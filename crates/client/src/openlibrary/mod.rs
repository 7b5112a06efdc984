//! OpenLibrary search client.
//!
//! Answers cache misses with `GET <base>/search.json?q=<query>&limit=<n>`.
//!
//! - **Rate limiting**: requests are spaced at least `min_interval` apart.
//! - **Status mapping**: 429 is reported as rate limited, any other 4xx/5xx
//!   as an HTTP error carrying the status code.
//! - **Normalization**: the body is decoded into a `SearchRecord` with the
//!   documents kept as opaque JSON.

pub mod error;
pub mod request;
pub mod response;

pub use error::OpenLibraryError;
pub use request::SearchRequest;
pub use response::OpenLibraryResponse;

use async_trait::async_trait;
use fuzzcache_core::{AppConfig, SearchProvider, SearchRecord};
use reqwest::{StatusCode, header};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

/// Default base URL for OpenLibrary.
const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "fuzzcache/0.1";

/// Minimum interval between upstream requests.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(250);

/// OpenLibrary client configuration.
#[derive(Debug, Clone)]
pub struct OpenLibraryConfig {
    /// Base URL (default: https://openlibrary.org).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    pub user_agent: String,
    /// Minimum spacing between requests.
    pub min_interval: Duration,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_interval: MIN_REQUEST_INTERVAL,
        }
    }
}

impl OpenLibraryConfig {
    /// Build client settings from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.upstream_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            ..Default::default()
        }
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    /// Wait until the next request may be sent.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// OpenLibrary search client.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    endpoint: Url,
    rate_limiter: Arc<RateLimiter>,
}

impl OpenLibraryClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenLibraryConfig) -> Result<Self, OpenLibraryError> {
        let endpoint = search_endpoint(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| OpenLibraryError::Network(Arc::new(e)))?;

        Ok(Self { http, endpoint, rate_limiter: Arc::new(RateLimiter::new(config.min_interval)) })
    }

    /// Full search URL for a request.
    pub fn search_url(&self, req: &SearchRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", &req.q)
            .append_pair("limit", &req.limit.to_string());
        url
    }

    /// Run a search against OpenLibrary.
    pub async fn search(&self, req: SearchRequest) -> Result<SearchRecord, OpenLibraryError> {
        req.validate()?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let url = self.search_url(&req);

        tracing::debug!(query = %req.q, limit = req.limit, "searching OpenLibrary");

        let http_response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(status = %status, "OpenLibrary response status");
        check_status(status)?;

        let bytes = http_response.bytes().await?;
        let body: OpenLibraryResponse =
            serde_json::from_slice(&bytes).map_err(|e| OpenLibraryError::Parse(e.to_string()))?;

        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            num_found = body.num_found,
            docs = body.docs.len(),
            "search completed"
        );

        Ok(body.into())
    }
}

#[async_trait]
impl SearchProvider for OpenLibraryClient {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchRecord, fuzzcache_core::Error> {
        OpenLibraryClient::search(self, SearchRequest::new(query, limit)).await.map_err(Into::into)
    }
}

/// `<base>/search.json`, keeping any path already on the base URL.
fn search_endpoint(base_url: &str) -> Result<Url, OpenLibraryError> {
    let base = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|url| url.join("search.json"))
        .map_err(|e| OpenLibraryError::InvalidBaseUrl(format!("{base_url}: {e}")))
}

fn check_status(status: StatusCode) -> Result<(), OpenLibraryError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(OpenLibraryError::RateLimited);
    }

    if status.is_client_error() || status.is_server_error() {
        return Err(OpenLibraryError::HttpError { status: status.as_u16() });
    }

    Ok(())
}
