//! Price extraction
//!
//! Extraction runs an ordered list of strategies over the page content:
//! a site-specific CSS lookup first, then a search for the first
//! currency-looking amount anywhere in the page. Markup changes break the
//! first; the second survives them at the cost of occasionally picking up
//! an unrelated amount.

mod pattern;
mod selector;

pub use pattern::PatternSearch;
pub use selector::StructuredLookup;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::Site;

/// Currency prefixes stripped during normalization, longest first
const CURRENCY_MARKERS: &[&str] = &["Rs.", "Rs", "INR", "₹", "$", "€", "£"];

/// One way of finding a price in page content
pub trait ExtractionStrategy: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// The price, if this strategy can find one
    fn extract(&self, content: &str, site: &Site) -> Option<Decimal>;
}

/// Runs strategies in order and returns the first price found
pub struct PriceExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceExtractor {
    /// Structured lookup, then pattern search
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(StructuredLookup::new()),
            Box::new(PatternSearch),
        ])
    }

    /// Use an explicit strategy list
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extract a price from `content` served by `site`
    pub fn extract(&self, content: &str, site: &Site) -> Result<Decimal, ExtractionError> {
        for strategy in &self.strategies {
            if let Some(price) = strategy.extract(content, site) {
                debug!(strategy = strategy.name(), %site, %price, "Extracted price");
                return Ok(price);
            }
            debug!(strategy = strategy.name(), %site, "No price from strategy");
        }

        Err(ExtractionError::NotFound)
    }
}

/// Turn displayed price text into a decimal.
///
/// Strips a leading currency marker, whitespace, grouping commas and a
/// trailing decimal point, so `"₹45,999"`, `"45,999."` and `"Rs. 1,23,456.50"`
/// all parse. Returns `None` for anything else, including negative amounts.
pub fn normalize_price(raw: &str) -> Option<Decimal> {
    let mut text = raw.trim();
    for marker in CURRENCY_MARKERS {
        if let Some(rest) = text.strip_prefix(marker) {
            text = rest;
            break;
        }
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    cleaned.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("₹45,999", dec!(45999))]
    #[case("45,999.", dec!(45999))]
    #[case("₹ 1,999.00", dec!(1999))]
    #[case("Rs. 1,23,456.50", dec!(123456.50))]
    #[case("INR 799", dec!(799))]
    #[case("\u{a0}₹\u{a0}2,499\u{a0}", dec!(2499))]
    #[case("$19.99", dec!(19.99))]
    #[case("0", dec!(0))]
    fn test_normalize_price(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(normalize_price(raw), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("₹")]
    #[case("-1,999")]
    #[case("Currently unavailable")]
    #[case("Save 20%")]
    #[case("1.2.3")]
    fn test_normalize_rejects(#[case] raw: &str) {
        assert_eq!(normalize_price(raw), None);
    }

    #[test]
    fn test_structured_lookup_wins_over_pattern() {
        let html = r#"
            <html><body>
              <div class="deal">Was ₹9,999</div>
              <span class="a-price"><span class="a-price-whole">7,499.</span></span>
            </body></html>"#;

        let price = PriceExtractor::new().extract(html, &Site::Amazon).unwrap();
        assert_eq!(price, dec!(7499));
    }

    #[test]
    fn test_pattern_fallback_when_markup_changes() {
        let html = r#"<div class="renamedClass">₹1,999</div><div>₹2,999</div>"#;

        let price = PriceExtractor::new().extract(html, &Site::Flipkart).unwrap();
        assert_eq!(price, dec!(1999));
    }

    #[test]
    fn test_unknown_site_uses_pattern_only() {
        let html = r#"<span class="a-price-whole">100</span><p>Now Rs. 850</p>"#;

        let price = PriceExtractor::new()
            .extract(html, &Site::Other("croma".to_string()))
            .unwrap();
        assert_eq!(price, dec!(850));
    }

    #[test]
    fn test_not_found() {
        let html = "<html><body><p>Out of stock</p></body></html>";

        let err = PriceExtractor::new().extract(html, &Site::Amazon).unwrap_err();
        assert_eq!(err, ExtractionError::NotFound);
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn test_empty_strategy_list_finds_nothing() {
        let extractor = PriceExtractor::with_strategies(vec![]);
        assert!(extractor.extract("₹100", &Site::Amazon).is_err());
    }

    fn group_indian(n: u64) -> String {
        let digits = n.to_string();
        if digits.len() <= 3 {
            return digits;
        }
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, right) = rest.split_at(rest.len() - 2);
            groups.insert(0, right);
            rest = left;
        }
        groups.insert(0, rest);
        format!("{},{}", groups.join(","), tail)
    }

    proptest! {
        #[test]
        fn prop_grouped_amounts_normalize(n in 0u64..10_000_000_000) {
            let western = format!("₹{}", n.to_string()
                .as_bytes()
                .rchunks(3)
                .rev()
                .map(|c| std::str::from_utf8(c).unwrap())
                .collect::<Vec<_>>()
                .join(","));
            prop_assert_eq!(normalize_price(&western), Some(Decimal::from(n)));
            let indian = format!("₹{}", group_indian(n));
            prop_assert_eq!(normalize_price(&indian), Some(Decimal::from(n)));
        }
    }
}
