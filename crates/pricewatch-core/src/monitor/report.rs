//! Batch report

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{AlertEvent, DeliveryResult, PriceReading};

/// Everything observed for one item
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub name: String,
    pub target_price: Decimal,
    pub readings: Vec<PriceReading>,
    pub alert: Option<AlertEvent>,
    /// Deliveries made for this item's alert (per-item mode only)
    pub deliveries: Vec<DeliveryResult>,
}

/// Outcome of one pass over all items
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub items: Vec<ItemReport>,
    /// Deliveries of the combined message (digest mode only)
    pub digest_deliveries: Vec<DeliveryResult>,
    pub dry_run: bool,
}

impl BatchReport {
    /// Alerts raised this run, in item order
    pub fn alerts(&self) -> impl Iterator<Item = &AlertEvent> {
        self.items.iter().filter_map(|item| item.alert.as_ref())
    }

    /// Pages that could not be fetched or parsed
    pub fn failed_readings(&self) -> usize {
        self.items
            .iter()
            .flat_map(|item| &item.readings)
            .filter(|r| !r.is_success())
            .count()
    }

    /// Every delivery attempt, per-item and digest
    pub fn deliveries(&self) -> impl Iterator<Item = &DeliveryResult> {
        self.items
            .iter()
            .flat_map(|item| &item.deliveries)
            .chain(&self.digest_deliveries)
    }

    /// Human-readable summary
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for item in &self.items {
            let _ = writeln!(
                out,
                "--- {} (Target: ₹{}) ---",
                item.name,
                item.target_price.normalize()
            );

            for reading in &item.readings {
                match (reading.price(), reading.error_reason()) {
                    (Some(price), _) if crate::alerting::evaluate(price, item.target_price) => {
                        let _ = writeln!(out, "  {}: ₹{} - DEAL FOUND!", reading.site(), price.normalize());
                    }
                    (Some(price), _) => {
                        let _ = writeln!(out, "  {}: ₹{} - Above target", reading.site(), price.normalize());
                    }
                    (None, reason) => {
                        let _ = writeln!(
                            out,
                            "  {}: Could not fetch price ({})",
                            reading.site(),
                            reason.unwrap_or("unknown error")
                        );
                    }
                }
            }

            if let Some(alert) = &item.alert {
                let _ = writeln!(
                    out,
                    "  Best: {} at ₹{}, ₹{} below target",
                    alert.site,
                    alert.price.normalize(),
                    alert.savings().normalize()
                );
            }

            for delivery in &item.deliveries {
                write_delivery(&mut out, delivery);
            }
            out.push('\n');
        }

        for delivery in &self.digest_deliveries {
            write_delivery(&mut out, delivery);
        }

        let alerts = self.alerts().count();
        if alerts == 0 {
            out.push_str("No deals found. Will check again later.\n");
        } else if self.dry_run {
            let _ = writeln!(out, "{alerts} deal(s) found (dry run, no notifications sent).");
        } else {
            let _ = writeln!(out, "{alerts} deal(s) found.");
        }

        out
    }
}

fn write_delivery(out: &mut String, delivery: &DeliveryResult) {
    match &delivery.error {
        None => {
            let _ = writeln!(out, "  {} notification sent", delivery.channel);
        }
        Some(error) => {
            let _ = writeln!(out, "  {} notification failed: {}", delivery.channel, error);
        }
    }
}
