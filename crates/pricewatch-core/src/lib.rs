//! # Pricewatch
//!
//! Scheduled price monitor for e-commerce product pages.
//!
//! Each invocation loads a list of products, fetches every product page,
//! extracts the price and sends an alert when it is at or below the
//! product's target. Scheduling is left to cron or a CI scheduler; the
//! process does one pass and exits.
//!
//! ## Architecture
//!
//! - **Fetch**: ordered fetch strategies (proxy API, direct request)
//! - **Extract**: ordered extraction strategies (CSS lookup, currency pattern)
//! - **Alerting**: threshold evaluation and email/Telegram delivery
//! - **Monitor**: the sequential batch runner and its report
//!
//! ## Quick Start
//!
//! ```bash
//! # Check every product in config.json and send alerts
//! pricewatch run
//!
//! # Try a single page without notifying anyone
//! pricewatch check --site flipkart https://www.flipkart.com/p/itm123
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod alerting;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod items;
pub mod models;
pub mod monitor;

pub use crate::config::{Config, Credentials};
pub use crate::error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::{Notifier, ThresholdEvaluator};
    pub use crate::config::{Config, Credentials};
    pub use crate::error::{Error, Result};
    pub use crate::extract::PriceExtractor;
    pub use crate::fetch::Fetcher;
    pub use crate::items::{load_items, ItemCatalog};
    pub use crate::models::*;
    pub use crate::monitor::{BatchReport, RunOptions, Runner};
}
