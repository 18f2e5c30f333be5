//! Email channel (SMTP over implicit TLS)

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::notifier::NotificationChannel;
use crate::config::{EmailConfig, EmailCredentials};
use crate::error::{NotificationError, Result};

/// Sends alerts as plain-text mail from the sender to the recipient
pub struct EmailChannel {
    from: Mailbox,
    to: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailChannel {
    /// Validate addresses and prepare the SMTP relay. No connection is made
    /// until the first send.
    pub fn new(credentials: &EmailCredentials, config: &EmailConfig, timeout: Duration) -> Result<Self> {
        let from = parse_mailbox(&credentials.sender)?;
        let to = parse_mailbox(&credentials.recipient)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| NotificationError::Smtp(e.to_string()))?
            .port(config.smtp_port)
            .credentials(SmtpCredentials::new(
                credentials.sender.clone(),
                credentials.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self { from, to, transport })
    }

    fn build_message(&self, subject: &str, body: &str) -> std::result::Result<Message, NotificationError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotificationError::Message(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> std::result::Result<Mailbox, NotificationError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| NotificationError::Address {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, subject: &str, body: &str) -> std::result::Result<(), NotificationError> {
        let message = self.build_message(subject, body)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Smtp(e.to_string()))?;

        debug!(to = %self.to, "Email accepted by relay");
        Ok(())
    }
}
