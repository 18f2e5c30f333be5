//! Items file loading
//!
//! The items file is the product list the tool watches:
//!
//! ```json
//! {
//!   "products": [
//!     {
//!       "name": "Headphones",
//!       "target_price": 2000,
//!       "urls": [
//!         { "platform": "amazon", "url": "https://www.amazon.in/dp/B0XXXX" },
//!         { "platform": "flipkart", "url": "https://www.flipkart.com/p/itmXXXX" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Products are validated one at a time. A bad product is skipped with a
//! warning and never aborts the load; only an unreadable or non-JSON file
//! does.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{MonitoredItem, SourceUrl};

#[derive(Debug, Deserialize)]
struct ItemsFile {
    products: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    name: String,
    target_price: Decimal,
    urls: Vec<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(alias = "site")]
    platform: String,
    url: String,
}

/// A product entry that was not loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position in the `products` array
    pub index: usize,
    /// Product name, when one could be read
    pub name: Option<String>,
    pub reason: String,
}

/// Validated items plus whatever was skipped
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    pub items: Vec<MonitoredItem>,
    pub skipped: Vec<SkippedEntry>,
}

/// Read and validate the items file at `path`
pub fn load_items(path: &Path) -> Result<ItemCatalog> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::items(path.display().to_string(), e.to_string()))?;
    parse_items(&content).map_err(|e| match e {
        Error::Serialization(e) => Error::items(path.display().to_string(), e.to_string()),
        other => other,
    })
}

/// Validate an items document
pub fn parse_items(content: &str) -> Result<ItemCatalog> {
    let file: ItemsFile = serde_json::from_str(content)?;
    let mut catalog = ItemCatalog::default();

    for (index, value) in file.products.into_iter().enumerate() {
        let name = value
            .get("name")
            .and_then(|n| n.as_str())
            .map(String::from);

        match validate(value) {
            Ok(item) => {
                debug!(item = %item.name, urls = item.urls.len(), "Loaded item");
                catalog.items.push(item);
            }
            Err(reason) => {
                warn!(index, name = ?name, %reason, "Skipping malformed item");
                catalog.skipped.push(SkippedEntry {
                    index,
                    name,
                    reason,
                });
            }
        }
    }

    Ok(catalog)
}

fn validate(value: serde_json::Value) -> std::result::Result<MonitoredItem, String> {
    let raw: RawProduct = serde_json::from_value(value).map_err(|e| e.to_string())?;

    let name = raw.name.trim();
    if name.is_empty() {
        return Err("name is empty".to_string());
    }

    if raw.target_price.is_sign_negative() {
        return Err(format!("target_price {} is negative", raw.target_price));
    }

    let mut urls = Vec::with_capacity(raw.urls.len());
    for source in raw.urls {
        match url::Url::parse(source.url.trim()) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                urls.push(SourceUrl::new(source.platform, parsed.to_string()));
            }
            Ok(parsed) => {
                warn!(item = name, url = %source.url, scheme = parsed.scheme(), "Dropping non-HTTP URL");
            }
            Err(e) => {
                warn!(item = name, url = %source.url, error = %e, "Dropping unparseable URL");
            }
        }
    }

    if urls.is_empty() {
        return Err("no usable urls".to_string());
    }

    Ok(MonitoredItem {
        name: name.to_string(),
        urls,
        target_price: raw.target_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Site;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "products": [
            {
                "name": "Headphones",
                "target_price": 2000,
                "urls": [
                    {"platform": "amazon", "url": "https://www.amazon.in/dp/B0TEST"},
                    {"platform": "flipkart", "url": "https://www.flipkart.com/p/itmTEST"}
                ]
            },
            {"name": "No target", "urls": []},
            {"name": "Negative", "target_price": -5, "urls": [{"platform": "amazon", "url": "https://a.in"}]},
            {"name": "Bad urls", "target_price": 10, "urls": [{"platform": "amazon", "url": "not a url"}]},
            {
                "name": "Keyboard",
                "target_price": "1499.50",
                "urls": [
                    {"site": "croma", "url": "https://www.croma.com/kb"},
                    {"platform": "amazon", "url": "ftp://example.com/kb"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_malformed_entries_are_skipped() {
        let catalog = parse_items(SAMPLE).unwrap();

        let names: Vec<&str> = catalog.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Headphones", "Keyboard"]);

        let skipped: Vec<usize> = catalog.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![1, 2, 3]);
        assert_eq!(catalog.skipped[1].name.as_deref(), Some("Negative"));
        assert_eq!(catalog.skipped[2].reason, "no usable urls");
    }

    #[test]
    fn test_valid_entry_fields() {
        let catalog = parse_items(SAMPLE).unwrap();

        let headphones = &catalog.items[0];
        assert_eq!(headphones.target_price, dec!(2000));
        assert_eq!(headphones.urls[0].site, Site::Amazon);
        assert_eq!(headphones.urls[1].site, Site::Flipkart);

        let keyboard = &catalog.items[1];
        assert_eq!(keyboard.target_price, dec!(1499.50));
        assert_eq!(keyboard.urls.len(), 1);
        assert_eq!(keyboard.urls[0].site, Site::Other("croma".to_string()));
    }

    #[test]
    fn test_load_items_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = load_items(file.path()).unwrap();
        assert_eq!(catalog.items.len(), 2);
    }

    #[test]
    fn test_missing_or_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_items(&dir.path().join("config.json"));
        assert!(matches!(missing, Err(Error::Items { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let invalid = load_items(file.path());
        assert!(matches!(invalid, Err(Error::Items { .. })));
    }
}
