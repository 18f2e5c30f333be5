//! Batch runner
//!
//! One pass over the configured items: every URL of every item is fetched,
//! extracted and evaluated in order, one at a time. Failures are recorded
//! against the URL or channel they happened on and the pass always
//! completes.

mod report;

pub use report::{BatchReport, ItemReport};

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::alerting::{Notifier, ThresholdEvaluator};
use crate::config::{Config, NotifyMode};
use crate::extract::PriceExtractor;
use crate::fetch::Fetcher;
use crate::models::{AlertEvent, MonitoredItem, PriceReading, SourceUrl};

/// Where an item is in its pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStage {
    Pending,
    Fetching,
    Extracting,
    Evaluating,
    Notifying,
    Done,
}

impl fmt::Display for ItemStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemStage::Pending => "pending",
            ItemStage::Fetching => "fetching",
            ItemStage::Extracting => "extracting",
            ItemStage::Evaluating => "evaluating",
            ItemStage::Notifying => "notifying",
            ItemStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runner options
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Evaluate and report but never deliver
    pub dry_run: bool,
    /// Per-item messages or one digest at the end
    pub mode: NotifyMode,
    /// Pause between consecutive page fetches
    pub fetch_delay: Duration,
}

impl RunOptions {
    pub fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            dry_run,
            mode: config.notify.mode,
            fetch_delay: config.fetch.delay(),
        }
    }
}

/// Drives fetch, extract, evaluate and notify for a batch of items
pub struct Runner {
    fetcher: Fetcher,
    extractor: PriceExtractor,
    evaluator: ThresholdEvaluator,
    notifier: Notifier,
    options: RunOptions,
}

impl Runner {
    pub fn new(
        fetcher: Fetcher,
        extractor: PriceExtractor,
        notifier: Notifier,
        options: RunOptions,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            evaluator: ThresholdEvaluator::new(),
            notifier,
            options,
        }
    }

    /// Process every item once
    pub async fn run(&self, items: &[MonitoredItem]) -> BatchReport {
        let started_at = Utc::now();
        info!(
            items = items.len(),
            channels = ?self.notifier.channel_names(),
            dry_run = self.options.dry_run,
            "Starting price check"
        );

        let mut reports = Vec::with_capacity(items.len());
        let mut first_fetch = true;

        for item in items {
            reports.push(self.check_item(item, &mut first_fetch).await);
        }

        let mut digest_deliveries = Vec::new();
        if self.options.mode == NotifyMode::Digest && !self.options.dry_run {
            let alerts: Vec<AlertEvent> = reports.iter().filter_map(|r| r.alert.clone()).collect();
            if !alerts.is_empty() {
                info!(alerts = alerts.len(), "Sending digest");
                digest_deliveries = self.notifier.notify_digest(&alerts).await;
            }
        }

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            items: reports,
            digest_deliveries,
            dry_run: self.options.dry_run,
        };

        info!(
            alerts = report.alerts().count(),
            failed_readings = report.failed_readings(),
            "Price check finished"
        );

        report
    }

    async fn check_item(&self, item: &MonitoredItem, first_fetch: &mut bool) -> ItemReport {
        info!(item = %item.name, target = %item.target_price, "Checking item");
        debug!(item = %item.name, stage = %ItemStage::Pending);

        let mut readings = Vec::with_capacity(item.urls.len());
        for source in &item.urls {
            if !*first_fetch && !self.options.fetch_delay.is_zero() {
                tokio::time::sleep(self.options.fetch_delay).await;
            }
            *first_fetch = false;

            readings.push(self.read_price(item, source).await);
        }

        debug!(item = %item.name, stage = %ItemStage::Evaluating);
        let alert = self.evaluator.assess(item, &readings);

        let mut deliveries = Vec::new();
        if let Some(event) = &alert {
            info!(
                item = %item.name,
                price = %event.price,
                site = %event.site,
                "Deal found"
            );

            if self.options.mode == NotifyMode::PerItem && !self.options.dry_run {
                debug!(item = %item.name, stage = %ItemStage::Notifying);
                deliveries = self.notifier.notify(event).await;
            }
        }

        debug!(item = %item.name, stage = %ItemStage::Done);
        ItemReport {
            name: item.name.clone(),
            target_price: item.target_price,
            readings,
            alert,
            deliveries,
        }
    }

    /// Fetch and extract one page, recording any failure in the reading
    async fn read_price(&self, item: &MonitoredItem, source: &SourceUrl) -> PriceReading {
        debug!(item = %item.name, site = %source.site, url = %source.url, stage = %ItemStage::Fetching);
        let content = match self.fetcher.fetch(&source.url).await {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    item = %item.name,
                    site = %source.site,
                    url = %source.url,
                    status = ?e.status,
                    error = %e,
                    "Could not fetch page"
                );
                return PriceReading::failed(source, format!("fetch failed: {e}"));
            }
        };

        debug!(item = %item.name, site = %source.site, stage = %ItemStage::Extracting);
        match self.extractor.extract(&content, &source.site) {
            Ok(price) => {
                let above = if price <= item.target_price { "at or below" } else { "above" };
                info!(item = %item.name, site = %source.site, %price, "Price {above} target");
                PriceReading::found(source, price)
            }
            Err(e) => {
                warn!(
                    item = %item.name,
                    site = %source.site,
                    url = %source.url,
                    error = %e,
                    "Could not extract price"
                );
                PriceReading::failed(source, format!("extraction failed: {e}"))
            }
        }
    }

    /// Fetch and extract a single page outside of a batch
    pub async fn probe(&self, source: &SourceUrl) -> crate::Result<rust_decimal::Decimal> {
        let content = self.fetcher.fetch(&source.url).await?;
        Ok(self.extractor.extract(&content, &source.site)?)
    }
}
