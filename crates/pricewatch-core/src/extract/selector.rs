//! Site-specific CSS lookup

use std::collections::HashMap;

use rust_decimal::Decimal;
use scraper::{Html, Selector};

use super::{normalize_price, ExtractionStrategy};
use crate::models::Site;

const AMAZON_SELECTORS: &[&str] = &[
    "span.a-price-whole",
    "#corePrice_feature_div .a-offscreen",
    "#priceblock_ourprice",
    "#priceblock_dealprice",
];

const FLIPKART_SELECTORS: &[&str] = &["div.Nx9bqj", "div._30jeq3", "div._16Jk6d"];

/// Looks up the price element by selector; the first element whose text
/// normalizes to a price wins
pub struct StructuredLookup {
    selectors: HashMap<Site, Vec<Selector>>,
}

impl Default for StructuredLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredLookup {
    pub fn new() -> Self {
        let mut selectors = HashMap::new();
        selectors.insert(Site::Amazon, parse_all(AMAZON_SELECTORS));
        selectors.insert(Site::Flipkart, parse_all(FLIPKART_SELECTORS));
        Self { selectors }
    }
}

fn parse_all(raw: &[&str]) -> Vec<Selector> {
    raw.iter().filter_map(|s| Selector::parse(s).ok()).collect()
}

impl ExtractionStrategy for StructuredLookup {
    fn name(&self) -> &str {
        "structured"
    }

    fn extract(&self, content: &str, site: &Site) -> Option<Decimal> {
        let selectors = self.selectors.get(site)?;
        let document = Html::parse_document(content);

        selectors
            .iter()
            .flat_map(|selector| document.select(selector))
            .find_map(|element| normalize_price(&element.text().collect::<String>()))
    }
}
