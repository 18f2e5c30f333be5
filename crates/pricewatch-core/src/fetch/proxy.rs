//! Proxy-fetch API requests
//!
//! The proxy service takes the target page as a query parameter and returns
//! its content, which gets past the bot checks some shops apply to direct
//! requests.

use async_trait::async_trait;
use reqwest::Client;

use super::{read_body, request_error, FetchStrategy};
use crate::error::FetchError;

/// GET `{endpoint}?api_key=..&url=..`
pub struct ProxyFetch {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ProxyFetch {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl FetchStrategy for ProxyFetch {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("api_key", self.api_key.as_str()), ("url", url)])
            .send()
            .await
            .map_err(request_error)?;

        read_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use crate::fetch::{build_client, DirectFetch, Fetcher};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_passes_key_and_target_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("api_key", "secret"))
            .and(query_param("url", "https://www.flipkart.com/p/itm1?pid=9"))
            .respond_with(ResponseTemplate::new(200).set_body_string("proxied"))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_client(&FetchConfig::default()).unwrap();
        let proxy = ProxyFetch::new(client, format!("{}/", server.uri()), "secret");

        let body = proxy
            .fetch("https://www.flipkart.com/p/itm1?pid=9")
            .await
            .unwrap();
        assert_eq!(body, "proxied");
    }

    #[tokio::test]
    async fn test_proxy_failure_falls_back_to_direct() {
        let proxy_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&proxy_server)
            .await;

        let shop = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p/itm1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("direct"))
            .expect(1)
            .mount(&shop)
            .await;

        let client = build_client(&FetchConfig::default()).unwrap();
        let fetcher = Fetcher::with_strategies(vec![
            Box::new(ProxyFetch::new(client.clone(), proxy_server.uri(), "secret")),
            Box::new(DirectFetch::new(client)),
        ]);

        let body = fetcher.fetch(&format!("{}/p/itm1", shop.uri())).await.unwrap();
        assert_eq!(body, "direct");
    }
}
