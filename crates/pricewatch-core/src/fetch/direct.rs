//! Direct page requests

use async_trait::async_trait;
use reqwest::Client;

use super::{read_body, request_error, FetchStrategy};
use crate::error::FetchError;

/// Plain GET with the client's browser-like headers
pub struct DirectFetch {
    client: Client,
}

impl DirectFetch {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchStrategy for DirectFetch {
    fn name(&self) -> &str {
        "direct"
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(request_error)?;
        read_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use crate::fetch::build_client;
    use std::time::Duration;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_sends_browser_headers_and_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dp/B0TEST"))
            .and(header_exists("user-agent"))
            .and(header_exists("accept-language"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<span>₹1,999</span>"))
            .expect(1)
            .mount(&server)
            .await;

        let config = FetchConfig::default();
        let fetch = DirectFetch::new(build_client(&config).unwrap());

        let body = fetch
            .fetch(&format!("{}/dp/B0TEST", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<span>₹1,999</span>");
    }

    #[tokio::test]
    async fn test_non_200_is_a_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetch = DirectFetch::new(build_client(&FetchConfig::default()).unwrap());
        let err = fetch.fetch(&server.uri()).await.unwrap_err();

        assert_eq!(err.status, Some(503));
        assert!(err.reason.contains("503"));
    }

    #[tokio::test]
    async fn test_unreachable_host_has_no_status() {
        // Bind and release a port so nothing is listening on it
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let config = FetchConfig {
            timeout_secs: 2,
            ..FetchConfig::default()
        };
        let fetch = DirectFetch::new(build_client(&config).unwrap());

        let err = fetch.fetch(&format!("http://{addr}/")).await.unwrap_err();
        assert_eq!(err.status, None);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<span>₹1,999</span>")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = FetchConfig {
            timeout_secs: 1,
            ..FetchConfig::default()
        };
        let fetch = DirectFetch::new(build_client(&config).unwrap());

        let err = fetch.fetch(&server.uri()).await.unwrap_err();
        assert_eq!(err.status, None);
        assert!(err.reason.contains("timed out"), "{}", err.reason);
    }
}
