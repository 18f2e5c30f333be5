//! Alert data models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::item::Site;

/// A price at or below target (triggered alert)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Item display name
    pub item_name: String,

    /// Lowest qualifying price seen this run
    pub price: Decimal,

    /// The target it was compared against
    pub target_price: Decimal,

    /// Page the price came from
    pub url: String,

    /// Shop the price came from
    pub site: Site,

    /// When the alert was raised
    pub triggered_at: DateTime<Utc>,
}

impl AlertEvent {
    /// Amount below target (zero when exactly at target)
    pub fn savings(&self) -> Decimal {
        self.target_price - self.price
    }
}

/// Record of one delivery attempt on one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// Channel type
    pub channel: String,

    /// Whether it succeeded
    pub success: bool,

    /// Error message if failed
    pub error: Option<String>,

    /// When it was attempted
    pub sent_at: DateTime<Utc>,
}
