//! Pricewatch CLI
//!
//! Command-line interface for the Pricewatch price monitor.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use pricewatch::config::LogFormat;
use pricewatch::prelude::*;

/// Pricewatch - price drop alerts for product pages
#[derive(Parser)]
#[command(name = "pricewatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Settings file path
    #[arg(short, long, global = true, env = "PRICEWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (for commands that support it)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every product once and send alerts
    Run {
        /// Items file (overrides items_path from settings)
        #[arg(long)]
        items: Option<PathBuf>,

        /// Evaluate and report without sending notifications
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch one page and print the extracted price
    Check {
        /// Shop the page belongs to (amazon, flipkart, or any name)
        #[arg(long, default_value = "amazon")]
        site: Site,

        /// Product page URL
        url: String,
    },

    /// Load the items file and report which entries are usable
    Validate {
        /// Items file (overrides items_path from settings)
        #[arg(long)]
        items: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    // A missing .env is fine; credentials may come from the real environment
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    init_logging(&config, cli.verbose);

    let credentials = Credentials::from_env();

    // Execute command
    let result = match cli.command {
        Commands::Run { items, dry_run } => {
            run_batch(&config, &credentials, items.as_deref(), dry_run, cli.format).await
        }
        Commands::Check { site, url } => run_check(&config, &credentials, site, url, cli.format).await,
        Commands::Validate { items } => run_validate(&config, items.as_deref(), cli.format),
        Commands::Completions { .. } => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let log_level = if verbose { "debug" } else { config.logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

fn load_catalog(config: &Config, items: Option<&Path>) -> anyhow::Result<ItemCatalog> {
    let path = items.unwrap_or(&config.items_path);
    info!(path = %path.display(), "Loading items");
    load_items(path).context("could not load items")
}

async fn run_batch(
    config: &Config,
    credentials: &Credentials,
    items: Option<&Path>,
    dry_run: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let catalog = load_catalog(config, items)?;
    if catalog.items.is_empty() {
        warn!("No usable items configured, nothing to check");
    }

    let fetcher = Fetcher::new(&config.fetch, credentials.proxy_api_key.as_deref())?;
    let notifier = Notifier::from_config(config, credentials);
    if !notifier.is_enabled() {
        warn!("No notification channel configured, alerts will only be logged");
    }

    let runner = Runner::new(
        fetcher,
        PriceExtractor::new(),
        notifier,
        RunOptions::from_config(config, dry_run),
    );
    let report = runner.run(&catalog.items).await;

    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

async fn run_check(
    config: &Config,
    credentials: &Credentials,
    site: Site,
    url: String,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let runner = Runner::new(
        Fetcher::new(&config.fetch, credentials.proxy_api_key.as_deref())?,
        PriceExtractor::new(),
        Notifier::with_channels(Vec::new(), config.notify.subject.clone()),
        RunOptions::from_config(config, true),
    );

    let source = SourceUrl::new(site, url);
    let price = runner
        .probe(&source)
        .await
        .with_context(|| format!("{} ({})", source.url, source.site))?;

    match format {
        OutputFormat::Text => println!("{}: ₹{}", source.site, price.normalize()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "site": source.site, "url": source.url, "price": price })
        ),
    }

    Ok(())
}

fn run_validate(config: &Config, items: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = load_catalog(config, items)?;

    match format {
        OutputFormat::Text => {
            for item in &catalog.items {
                println!(
                    "ok       {} (target ₹{}, {} url(s))",
                    item.name,
                    item.target_price.normalize(),
                    item.urls.len()
                );
            }
            for skipped in &catalog.skipped {
                println!(
                    "skipped  #{} {}: {}",
                    skipped.index,
                    skipped.name.as_deref().unwrap_or("<unnamed>"),
                    skipped.reason
                );
            }
            println!("{} usable, {} skipped", catalog.items.len(), catalog.skipped.len());
        }
        OutputFormat::Json => {
            let skipped: Vec<_> = catalog
                .skipped
                .iter()
                .map(|s| serde_json::json!({ "index": s.index, "name": s.name, "reason": s.reason }))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "items": catalog.items,
                    "skipped": skipped,
                }))?
            );
        }
    }

    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "pricewatch", &mut io::stdout());
}
