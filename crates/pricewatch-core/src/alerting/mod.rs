//! Alerting for Pricewatch
//!
//! Threshold evaluation of price readings and best-effort notification
//! delivery over email and Telegram.

mod email;
mod evaluator;
mod notifier;
mod telegram;

pub use email::EmailChannel;
pub use evaluator::{evaluate, ThresholdEvaluator};
pub use notifier::{format_digest, NotificationChannel, Notifier};
pub use telegram::TelegramChannel;
