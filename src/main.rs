//! site-corpus main entry point
//!
//! This is the command-line interface for crawling a site into a text corpus
//! and normalizing a saved corpus.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use site_corpus::config::{load_config_with_hash, validate, Config};
use site_corpus::crawler::{run_crawl, spawn_deadline, spawn_interrupt_handler};
use site_corpus::output::print_report;
use site_corpus::url::UrlFilter;
use site_corpus::{normalize_corpus, CorpusWriter, Normalizer};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// site-corpus: a bounded single-site crawler
///
/// Crawls one website breadth-first within a page budget, saves the text of
/// every page as a JSON corpus, and strips boilerplate from a saved corpus.
#[derive(Parser, Debug)]
#[command(name = "site-corpus")]
#[command(version)]
#[command(about = "A bounded single-site crawler and corpus normalizer", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the site and write the raw corpus
    Crawl {
        /// Seed URL (overrides crawler.seed-url)
        #[arg(long)]
        seed: Option<String>,

        /// Page budget (overrides crawler.page-budget)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Delay between fetches in milliseconds (overrides crawler.delay-ms)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Number of concurrent workers (overrides crawler.workers)
        #[arg(long)]
        workers: Option<usize>,

        /// Raw corpus path (overrides output.raw-path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Validate config and show what would be crawled without crawling
        #[arg(long)]
        dry_run: bool,
    },

    /// Normalize a saved raw corpus into JSONL and a text dump
    Normalize {
        /// Raw corpus path (overrides output.raw-path)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// JSONL output path (overrides output.cleaned-jsonl-path)
        #[arg(long)]
        jsonl: Option<PathBuf>,

        /// Text dump output path (overrides output.cleaned-text-path)
        #[arg(long)]
        text: Option<PathBuf>,
    },

    /// Validate the configuration and print the effective settings
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    match cli.command {
        Command::Crawl {
            seed,
            max_pages,
            delay_ms,
            workers,
            output,
            dry_run,
        } => {
            if let Some(seed) = seed {
                config.crawler.seed_url = Some(seed);
            }
            if let Some(max_pages) = max_pages {
                config.crawler.page_budget = max_pages;
            }
            if let Some(delay_ms) = delay_ms {
                config.crawler.delay_ms = delay_ms;
            }
            if let Some(workers) = workers {
                config.crawler.workers = workers;
            }
            if let Some(output) = output {
                config.output.raw_path = output.to_string_lossy().into_owned();
            }
            validate(&config).context("Invalid crawl settings")?;

            if dry_run {
                handle_dry_run(&config)?;
            } else {
                handle_crawl(&config, cli.quiet).await?;
            }
        }
        Command::Normalize { input, jsonl, text } => {
            let raw = input.unwrap_or_else(|| PathBuf::from(&config.output.raw_path));
            let jsonl =
                jsonl.unwrap_or_else(|| PathBuf::from(&config.output.cleaned_jsonl_path));
            let text = text.unwrap_or_else(|| PathBuf::from(&config.output.cleaned_text_path));
            handle_normalize(&config, &raw, &jsonl, &text)?;
        }
        Command::Check => {
            print_config(&config);
            println!("\n✓ Configuration is valid");
        }
    }

    Ok(())
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Invalid configuration file {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_corpus=info,warn"),
            1 => EnvFilter::new("site_corpus=debug,info"),
            2 => EnvFilter::new("site_corpus=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn print_config(config: &Config) {
    println!("=== site-corpus Configuration ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Seed URL: {}",
        config.crawler.seed_url.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  Root domain: {}",
        config.crawler.root_domain.as_deref().unwrap_or("(from seed)")
    );
    println!("  Scope policy: {:?}", config.crawler.scope_policy);
    println!("  Page budget: {}", config.crawler.page_budget);
    println!("  Delay: {}ms", config.crawler.delay_ms);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Workers: {}", config.crawler.workers);
    if let Some(secs) = config.crawler.max_duration_secs {
        println!("  Max duration: {}s", secs);
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Raw corpus: {}", config.output.raw_path);
    println!("  Cleaned JSONL: {}", config.output.cleaned_jsonl_path);
    println!("  Cleaned text: {}", config.output.cleaned_text_path);

    println!(
        "\nBoilerplate Patterns ({}):",
        config.normalizer.patterns.len()
    );
    for pattern in &config.normalizer.patterns {
        println!("  - {:?}", pattern);
    }
}

/// Handles --dry-run: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<()> {
    print_config(config);

    let seed = config.crawler.seed()?;
    let filter = UrlFilter::for_seed(&seed, &config.crawler)?;

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl up to {} pages from {} on hosts matching '{}'",
        config.crawler.page_budget,
        seed,
        filter.root_domain()
    );

    Ok(())
}

/// Handles the crawl operation and writes the raw corpus
async fn handle_crawl(config: &Config, quiet: bool) -> Result<()> {
    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());
    if let Some(limit) = config.crawler.max_duration() {
        spawn_deadline(cancel.clone(), limit);
    }

    let report = match run_crawl(config, cancel.clone()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };
    cancel.cancel();

    let path = CorpusWriter::new(&config.output.raw_path)
        .write(&report.documents)
        .context("Failed to save the raw corpus")?;
    if !quiet {
        print_report(&report);
        println!("✓ Saved {} pages to {}", report.documents.len(), path.display());
    }

    Ok(())
}

/// Handles the normalize operation
fn handle_normalize(
    config: &Config,
    raw: &Path,
    jsonl: &Path,
    text: &Path,
) -> Result<()> {
    let normalizer =
        Normalizer::from_config(config).context("Invalid boilerplate patterns")?;

    match normalize_corpus(raw, jsonl, text, &normalizer) {
        Ok(report) => {
            println!(
                "✓ Cleaned {} records, saved to:\n - {}\n - {}",
                report.records,
                report.jsonl_path.display(),
                report.text_path.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Normalization failed: {}", e);
            Err(e.into())
        }
    }
}
