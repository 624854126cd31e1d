//! Vitrine main entry point
//!
//! This is the command-line interface for the Vitrine catalog crawler.

use anyhow::Context;
use clap::Parser;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use vitrine::config::{load_config_with_hash, validate, Config};
use vitrine::crawler::crawl;
use vitrine::output::{export_all, export_stem, ExportFormat, RunSummary};

/// Vitrine: a resilient catalog crawler
///
/// Vitrine walks a paginated catalog page by page, retrying transient
/// failures, backing off from rate limits and stopping on anti-bot
/// challenges, then exports every record it extracted.
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(version = "1.0.0")]
#[command(about = "A resilient catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// First listing page to crawl
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Stop after this many pages
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Site profile used for extraction
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,

    /// Directory for exports and the log file
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Also export records as JSON
    #[arg(long)]
    json: bool,

    /// Also export records as Excel
    #[arg(long)]
    excel: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.crawl.start_url = url.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.crawl.max_pages = Some(max_pages);
        }
        if let Some(profile) = &self.profile {
            config.crawl.profile = profile.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if self.json {
            config.output.json = true;
        }
        if self.excel {
            config.output.excel = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration before logging so the log file lands in the right directory
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };
    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    let log_file = if config.output.log_file && !cli.dry_run {
        Some(open_log_file(&config.output.log_path())?)
    } else {
        None
    };
    setup_logging(cli.verbose, cli.quiet, log_file);

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => {
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash)
        }
        _ => tracing::info!("No configuration file given, using defaults"),
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    handle_crawl(&config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Console output always; a second plain-text layer when a log file is given.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<File>) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vitrine=info,warn"),
            1 => EnvFilter::new("vitrine=debug,info"),
            2 => EnvFilter::new("vitrine=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Opens the log file for appending, creating its directory if needed
fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(directory) = path.parent() {
        std::fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create output directory {}", directory.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Vitrine Dry Run ===\n");

    let effective = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", effective);

    let profile = config.crawl.site_profile()?;
    println!("✓ Configuration is valid");
    println!(
        "✓ Would crawl {} with profile {} ({})",
        config.crawl.start_url,
        profile,
        match config.crawl.max_pages {
            Some(n) => format!("at most {} pages", n),
            None => "no page limit".to_string(),
        }
    );

    Ok(())
}

/// Handles the main crawl operation
///
/// Exit code 0 when at least one record was extracted, 1 otherwise.
async fn handle_crawl(config: &Config, quiet: bool) -> anyhow::Result<ExitCode> {
    let started = Instant::now();
    let stem = export_stem(chrono::Local::now());

    let outcome = crawl(config).await.context("Crawl failed to start")?;
    let summary = RunSummary::from_outcome(&outcome, started.elapsed());
    summary.log();

    if !summary.is_success() {
        return Ok(ExitCode::from(1));
    }

    let records = outcome.into_records();
    for (format, result) in export_all(&records, &config.output, &stem) {
        match result {
            Ok(path) => tracing::info!("Saved {} file: {}", format, path.display()),
            Err(e) if format == ExportFormat::Excel => {
                tracing::warn!("{} export skipped: {}", format, e)
            }
            Err(e) => {
                return Err(anyhow::Error::new(e).context(format!("{} export failed", format)))
            }
        }
    }

    if !quiet {
        summary.print();
    }

    Ok(ExitCode::SUCCESS)
}
