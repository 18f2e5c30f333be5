//! Price reading model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::item::{Site, SourceUrl};

/// Outcome of checking one page.
///
/// Built through [`PriceReading::found`] or [`PriceReading::failed`], so a
/// failed reading never carries a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReading {
    url: String,
    site: Site,
    price: Option<Decimal>,
    success: bool,
    error_reason: Option<String>,
    checked_at: DateTime<Utc>,
}

impl PriceReading {
    /// A page that yielded a price
    pub fn found(source: &SourceUrl, price: Decimal) -> Self {
        Self {
            url: source.url.clone(),
            site: source.site.clone(),
            price: Some(price),
            success: true,
            error_reason: None,
            checked_at: Utc::now(),
        }
    }

    /// A page that could not be fetched or parsed
    pub fn failed(source: &SourceUrl, reason: impl Into<String>) -> Self {
        Self {
            url: source.url.clone(),
            site: source.site.clone(),
            price: None,
            success: false,
            error_reason: Some(reason.into()),
            checked_at: Utc::now(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error_reason(&self) -> Option<&str> {
        self.error_reason.as_deref()
    }
}
