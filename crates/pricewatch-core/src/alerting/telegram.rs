//! Telegram bot channel

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::notifier::NotificationChannel;
use crate::config::{TelegramConfig, TelegramCredentials};
use crate::error::{Error, NotificationError, Result};

/// Posts alert text to a chat through the Bot API `sendMessage` method
pub struct TelegramChannel {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

impl TelegramChannel {
    pub fn new(
        credentials: &TelegramCredentials,
        config: &TelegramConfig,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build Telegram client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: credentials.bot_token.clone(),
            chat_id: credentials.chat_id.clone(),
        })
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, _subject: &str, body: &str) -> std::result::Result<(), NotificationError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text: body,
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            // reqwest errors carry the URL, which contains the bot token
            .map_err(|e| NotificationError::Http(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                channel: "Telegram".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        debug!(chat_id = %self.chat_id, "Telegram message accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn channel(server: &MockServer) -> TelegramChannel {
        TelegramChannel::new(
            &TelegramCredentials {
                bot_token: "123:abc".to_string(),
                chat_id: "42".to_string(),
            },
            &TelegramConfig {
                api_base: format!("{}/", server.uri()),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_posts_chat_id_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({"chat_id": "42", "text": "🔥 Deal Alert!"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        channel(&server)
            .send("ignored", "🔥 Deal Alert!")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejection_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("chat not found"))
            .mount(&server)
            .await;

        let err = channel(&server).send("s", "b").await.unwrap_err();
        match err {
            NotificationError::Rejected { status, body, .. } => {
                assert_eq!(status, 400);
                assert_eq!(body, "chat not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_slow_api_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let channel = TelegramChannel::new(
            &TelegramCredentials {
                bot_token: "123:abc".to_string(),
                chat_id: "42".to_string(),
            },
            &TelegramConfig {
                api_base: server.uri(),
            },
            Duration::from_secs(1),
        )
        .unwrap();

        let err = channel.send("s", "b").await.unwrap_err();
        match err {
            NotificationError::Http(reason) => assert!(!reason.contains("123:abc"), "{reason}"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
