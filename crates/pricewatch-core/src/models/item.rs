//! Monitored item models

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shop a product page belongs to.
///
/// Known sites get a structured price lookup; anything else falls back to
/// the currency pattern search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Site {
    /// amazon.in
    Amazon,
    /// flipkart.com
    Flipkart,
    /// Any other shop, kept by its configured name
    Other(String),
}

impl Site {
    /// Lowercase name used in config files and logs
    pub fn as_str(&self) -> &str {
        match self {
            Site::Amazon => "amazon",
            Site::Flipkart => "flipkart",
            Site::Other(name) => name,
        }
    }
}

impl From<String> for Site {
    fn from(name: String) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "amazon" => Site::Amazon,
            "flipkart" => Site::Flipkart,
            other => Site::Other(other.to_string()),
        }
    }
}

impl From<&str> for Site {
    fn from(name: &str) -> Self {
        Site::from(name.to_string())
    }
}

impl From<Site> for String {
    fn from(site: Site) -> Self {
        site.as_str().to_string()
    }
}

impl FromStr for Site {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Site::from(s))
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product page to check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUrl {
    /// Shop hosting the page
    pub site: Site,
    /// Product page URL
    pub url: String,
}

impl SourceUrl {
    /// Create a new source
    pub fn new(site: impl Into<Site>, url: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            url: url.into(),
        }
    }
}

/// A product watched across one or more shops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredItem {
    /// Display name
    pub name: String,

    /// Pages to check, in the order they are tried
    pub urls: Vec<SourceUrl>,

    /// Alert when a price is at or below this value
    pub target_price: Decimal,
}
