//! Currency pattern search

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use super::{normalize_price, ExtractionStrategy};
use crate::models::Site;

/// Currency marker, optional spacing, then digit groups with optional
/// thousands separators and fraction
static PRICE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:₹|Rs\.?|INR|\$|€|£)\s*([0-9][0-9,]*(?:\.[0-9]+)?)")
        .expect("price pattern is valid")
});

/// First currency-looking amount anywhere in the page, regardless of site
pub struct PatternSearch;

impl ExtractionStrategy for PatternSearch {
    fn name(&self) -> &str {
        "pattern"
    }

    fn extract(&self, content: &str, _site: &Site) -> Option<Decimal> {
        PRICE_PATTERN
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .find_map(|amount| normalize_price(amount.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(r#"{"price":"₹45,999"}"#, dec!(45999))]
    #[case("Deal price: ₹ 1,999 only", dec!(1999))]
    #[case("MRP Rs.2,500 incl. taxes", dec!(2500))]
    #[case("<b>$1,049.99</b> and later $5", dec!(1049.99))]
    #[case("first ₹100, then ₹200", dec!(100))]
    fn test_first_match_wins(#[case] content: &str, #[case] expected: Decimal) {
        assert_eq!(PatternSearch.extract(content, &Site::Flipkart), Some(expected));
    }

    #[test]
    fn test_no_currency_no_price() {
        assert_eq!(PatternSearch.extract("Only 3 left, 45,999 sold", &Site::Amazon), None);
    }
}
