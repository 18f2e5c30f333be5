//! Notification delivery for alerts

use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::{Config, Credentials};
use crate::error::NotificationError;
use crate::models::{AlertEvent, DeliveryResult};

use super::email::EmailChannel;
use super::telegram::TelegramChannel;

/// A delivery mechanism for alert messages
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Channel type, recorded in delivery results
    fn name(&self) -> &str;

    /// Deliver one message
    async fn send(&self, subject: &str, body: &str) -> std::result::Result<(), NotificationError>;
}

/// Sends alerts through every configured channel.
///
/// Channels are independent: each one is attempted in order and a failure
/// is recorded without stopping the rest.
pub struct Notifier {
    channels: Vec<Box<dyn NotificationChannel>>,
    subject: String,
}

impl Notifier {
    /// Build the channels whose credentials are complete.
    ///
    /// A channel that cannot be set up (bad address, client build failure)
    /// is left out with a warning; the others are still built.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Self {
        let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();
        let timeout = config.notify.timeout();

        match &credentials.email {
            Some(email) => match EmailChannel::new(email, &config.email, timeout) {
                Ok(channel) => channels.push(Box::new(channel)),
                Err(e) => warn!(channel = "email", error = %e, "Channel disabled"),
            },
            None => debug!("Email not configured, channel disabled"),
        }

        match &credentials.telegram {
            Some(telegram) => match TelegramChannel::new(telegram, &config.telegram, timeout) {
                Ok(channel) => channels.push(Box::new(channel)),
                Err(e) => warn!(channel = "telegram", error = %e, "Channel disabled"),
            },
            None => debug!("Telegram not configured, channel disabled"),
        }

        Self::with_channels(channels, config.notify.subject.clone())
    }

    /// Use an explicit channel list
    pub fn with_channels(channels: Vec<Box<dyn NotificationChannel>>, subject: impl Into<String>) -> Self {
        Self {
            channels,
            subject: subject.into(),
        }
    }

    /// Names of the enabled channels
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Whether any channel is enabled
    pub fn is_enabled(&self) -> bool {
        !self.channels.is_empty()
    }

    /// Send one alert
    pub async fn notify(&self, event: &AlertEvent) -> Vec<DeliveryResult> {
        self.deliver(&format_digest(std::slice::from_ref(event))).await
    }

    /// Send several alerts as one message; nothing is sent for an empty list
    pub async fn notify_digest(&self, events: &[AlertEvent]) -> Vec<DeliveryResult> {
        if events.is_empty() {
            return Vec::new();
        }
        self.deliver(&format_digest(events)).await
    }

    async fn deliver(&self, body: &str) -> Vec<DeliveryResult> {
        let mut results = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let sent_at = Utc::now();
            let result = channel.send(&self.subject, body).await;

            match &result {
                Ok(()) => info!(channel = channel.name(), "Notification sent"),
                Err(e) => warn!(channel = channel.name(), error = %e, "Notification failed"),
            }

            results.push(DeliveryResult {
                channel: channel.name().to_string(),
                success: result.is_ok(),
                error: result.err().map(|e| e.to_string()),
                sent_at,
            });
        }

        results
    }
}

/// Message body listing each alert with its shop, price, target and link
pub fn format_digest(events: &[AlertEvent]) -> String {
    let mut message = String::from("🔥 Deal Alert!\n\n");

    for event in events {
        let _ = writeln!(message, "{}", event.item_name);
        let _ = writeln!(
            message,
            "  {}: ₹{} (Target: ₹{})",
            event.site,
            event.price.normalize(),
            event.target_price.normalize()
        );
        let _ = writeln!(message, "  {}\n", event.url);
    }

    message
}
