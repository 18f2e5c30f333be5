//! Threshold evaluation

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{AlertEvent, MonitoredItem, PriceReading};

/// True iff `price` is at or below `target`
pub fn evaluate(price: Decimal, target: Decimal) -> bool {
    price <= target
}

/// Folds an item's readings into at most one alert.
///
/// Stateless: every run is judged on its own readings, so an item that stays
/// under target alerts on every run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThresholdEvaluator;

impl ThresholdEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Alert for the lowest successful reading, if it is at or below target.
    ///
    /// Ties go to the earliest reading, i.e. the first configured URL.
    pub fn assess(&self, item: &MonitoredItem, readings: &[PriceReading]) -> Option<AlertEvent> {
        let (reading, price) = readings
            .iter()
            .filter_map(|r| r.price().map(|p| (r, p)))
            .fold(None, |best: Option<(&PriceReading, Decimal)>, (r, p)| match best {
                Some((_, best_price)) if best_price <= p => best,
                _ => Some((r, p)),
            })?;

        let alert = evaluate(price, item.target_price);
        debug!(
            item = %item.name,
            %price,
            target = %item.target_price,
            alert,
            "Evaluated item"
        );

        alert.then(|| AlertEvent {
            item_name: item.name.clone(),
            price,
            target_price: item.target_price,
            url: reading.url().to_string(),
            site: reading.site().clone(),
            triggered_at: Utc::now(),
        })
    }
}
