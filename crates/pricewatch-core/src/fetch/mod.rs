//! Page fetching
//!
//! A [`Fetcher`] holds an ordered list of [`FetchStrategy`] values and
//! returns the content from the first one that succeeds. With a proxy key
//! configured the list is `[proxy, direct]`, otherwise just `[direct]`.

mod direct;
mod proxy;

pub use direct::DirectFetch;
pub use proxy::ProxyFetch;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::{Error, FetchError, Result};

/// One way of retrieving a page
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Retrieve the raw page content for `url`
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

/// Tries each strategy in order until one returns content
pub struct Fetcher {
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl Fetcher {
    /// Build the standard chain from settings and an optional proxy key
    pub fn new(config: &FetchConfig, proxy_api_key: Option<&str>) -> Result<Self> {
        let client = build_client(config)?;
        let mut strategies: Vec<Box<dyn FetchStrategy>> = Vec::with_capacity(2);

        if let Some(key) = proxy_api_key {
            strategies.push(Box::new(ProxyFetch::new(
                client.clone(),
                &config.proxy_endpoint,
                key,
            )));
        }
        strategies.push(Box::new(DirectFetch::new(client)));

        Ok(Self::with_strategies(strategies))
    }

    /// Use an explicit strategy list
    pub fn with_strategies(strategies: Vec<Box<dyn FetchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies, in the order they are tried
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Fetch `url`, falling through the strategies in order.
    ///
    /// When every strategy fails the last error is returned.
    pub async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let mut last_error = FetchError::network("no fetch strategy configured");

        for strategy in &self.strategies {
            match strategy.fetch(url).await {
                Ok(content) => {
                    debug!(
                        strategy = strategy.name(),
                        url,
                        bytes = content.len(),
                        "Fetched page"
                    );
                    return Ok(content);
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), url, error = %e, "Fetch strategy failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

/// Shared HTTP client with browser-like headers and a bounded timeout
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent)
            .map_err(|e| Error::config(format!("invalid user_agent: {e}")))?,
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language)
            .map_err(|e| Error::config(format!("invalid accept_language: {e}")))?,
    );

    Client::builder()
        .default_headers(headers)
        .timeout(config.timeout())
        .build()
        .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))
}

/// Turn a response into page content; anything but 200 is an error
async fn read_body(response: Response) -> std::result::Result<String, FetchError> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::status(
            status.as_u16(),
            format!("unexpected status {status}"),
        ));
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::network(format!("failed to read body: {e}")))
}

fn request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::network(format!("request timed out: {e}"))
    } else {
        FetchError::network(format!("request failed: {e}"))
    }
}
