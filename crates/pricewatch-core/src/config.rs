//! Configuration management for Pricewatch
//!
//! Settings come from an optional TOML file layered with `PRICEWATCH__*`
//! environment variables. Credentials are read separately, once, into
//! [`Credentials`] and handed to the fetcher and notifier constructors.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "pricewatch.toml";

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Items file (JSON product list)
    pub items_path: PathBuf,

    /// Page fetching
    pub fetch: FetchConfig,

    /// Notification behaviour
    pub notify: NotifyConfig,

    /// Email channel settings
    pub email: EmailConfig,

    /// Telegram channel settings
    pub telegram: TelegramConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            items_path: PathBuf::from("config.json"),
            fetch: FetchConfig::default(),
            notify: NotifyConfig::default(),
            email: EmailConfig::default(),
            telegram: TelegramConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load settings from `path` (required) or `pricewatch.toml` (optional),
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("PRICEWATCH")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every request fail
    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_secs == 0 {
            return Err(Error::config("fetch.timeout_secs must be at least 1"));
        }
        if self.notify.timeout_secs == 0 {
            return Err(Error::config("notify.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

/// Page fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Pause between consecutive page fetches in milliseconds
    pub delay_ms: u64,
    /// Browser User-Agent sent with direct requests
    pub user_agent: String,
    /// Accept-Language header sent with direct requests
    pub accept_language: String,
    /// Proxy-fetch API endpoint, used when a proxy key is present
    pub proxy_endpoint: String,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            delay_ms: 0,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            proxy_endpoint: "https://api.scraperapi.com/".to_string(),
        }
    }
}

/// When alerts are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyMode {
    /// One message per alerting item, sent as soon as it is evaluated
    #[default]
    PerItem,
    /// One combined message after the whole batch
    Digest,
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub mode: NotifyMode,
    /// Per-delivery timeout in seconds
    pub timeout_secs: u64,
    /// Subject line for email and heading for chat messages
    pub subject: String,
}

impl NotifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            mode: NotifyMode::PerItem,
            timeout_secs: 20,
            subject: "Deal Alert! Price dropped!".to_string(),
        }
    }
}

/// SMTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// SMTP relay host (implicit TLS)
    pub smtp_host: String,
    /// SMTP relay port
    pub smtp_port: u16,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
        }
    }
}

/// Telegram Bot API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API base URL
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// SMTP login and addressing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    pub sender: String,
    pub password: String,
    pub recipient: String,
}

/// Telegram bot login and destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

/// Secrets supplied by the environment.
///
/// A channel is present only when every one of its variables is set and
/// non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: Option<EmailCredentials>,
    pub telegram: Option<TelegramCredentials>,
    pub proxy_api_key: Option<String>,
}

impl Credentials {
    /// Read from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let email = match (
            get("SENDER_EMAIL"),
            get("SENDER_PASSWORD"),
            get("RECIPIENT_EMAIL"),
        ) {
            (Some(sender), Some(password), Some(recipient)) => Some(EmailCredentials {
                sender,
                password,
                recipient,
            }),
            _ => None,
        };

        let telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramCredentials { bot_token, chat_id }),
            _ => None,
        };

        Self {
            email,
            telegram,
            proxy_api_key: get("SCRAPER_API_KEY"),
        }
    }
}
