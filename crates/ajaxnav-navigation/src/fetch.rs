//! Network seam
//!
//! Navigations only need "GET this URL with these headers, give me the body as
//! text", so that is all the `Fetcher` trait asks for. `HttpFetcher` is the
//! real implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

use crate::config::PartialHeader;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    /// Plain GET for a full document
    pub fn document(url: Url) -> Self {
        Self {
            url,
            headers: Vec::new(),
        }
    }

    /// GET marked as a programmatic request, asking for a fragment
    pub fn partial(url: Url, header: &PartialHeader) -> Self {
        Self {
            url,
            headers: vec![(header.name.clone(), header.value.clone())],
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issue a GET and return the body as text, whatever the status code.
    async fn fetch(&self, request: &FetchRequest) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcherOptions {
    pub user_agent: String,
    /// `None` waits for the server indefinitely
    pub timeout: Option<Duration>,
    pub max_redirects: usize,
}

impl Default for HttpFetcherOptions {
    fn default() -> Self {
        Self {
            user_agent: format!("ajaxnav/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
            max_redirects: 10,
        }
    }
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(options: HttpFetcherOptions) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::limited(options.max_redirects))
            .user_agent(options.user_agent);

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, FetchError> {
        let mut builder = self.client.get(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        // Error statuses still carry markup the server wants shown.
        tracing::debug!(
            url = %request.url,
            status = resp.status().as_u16(),
            "Fetched"
        );

        resp.text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}
