use aer_scraper::config::{find_config_file, load_config, Config};
use aer_scraper::output::{OutputFormat, RecordWriter};
use aer_scraper::sources::{AerSource, PageRange};
use aer_scraper::utils::HttpClient;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use futures_util::{pin_mut, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// AER Scraper - Export Applied Ecology Resources project records to TSV
#[derive(Parser, Debug)]
#[command(name = "aer-scraper")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export Applied Ecology Resources project records to TSV", long_about = None)]
struct Cli {
    /// First listing page to scrape (default: 1)
    #[arg(value_parser = clap::value_parser!(i64).range(1..))]
    start_page: Option<i64>,

    /// Last listing page to scrape; negative scrapes until the listing runs out
    /// (default: START_PAGE)
    #[arg(allow_negative_numbers = true)]
    page_limit: Option<i64>,

    /// Output file path (default: <output dir>/<prefix><range suffix>.<ext>)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, short, value_enum)]
    format: Option<Format>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listing URL to scrape
    #[arg(long)]
    base_url: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,
}

/// Output format for records
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Tab-separated values
    Tsv,
    /// JSON Lines
    Jsonl,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Tsv => OutputFormat::Tsv,
            Format::Jsonl => OutputFormat::Jsonl,
        }
    }
}

/// Page range and the file-name suffix that identifies it.
///
/// No pages given scrapes page 1 only. A single page scrapes just that page.
fn resolve_range(start_page: Option<i64>, page_limit: Option<i64>) -> (PageRange, String) {
    match (start_page, page_limit) {
        (None, _) => (PageRange::default(), String::new()),
        (Some(start), None) => (PageRange::new(start, start), format!("_{}", start)),
        (Some(start), Some(limit)) => (
            PageRange::new(start, limit),
            format!("_{}-{}", start, limit),
        ),
    }
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        config.scraper.base_url = base_url.clone();
    }
    if let Some(user_agent) = &cli.user_agent {
        config.scraper.user_agent = user_agent.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.scraper.timeout_secs = timeout;
    }
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli);

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("aer_scraper={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let (range, suffix) = resolve_range(cli.start_page, cli.page_limit);
    let format = config.output.format;
    let output_path = cli.output.clone().unwrap_or_else(|| {
        config.output.directory.join(format!(
            "{}{}.{}",
            config.output.file_prefix,
            suffix,
            format.extension()
        ))
    });

    let client = HttpClient::with_settings(
        &config.scraper.user_agent,
        Duration::from_secs(config.scraper.timeout_secs),
    )?;
    let source = AerSource::with_base_url(Arc::new(client), config.scraper.base_url.clone());

    let mut writer = RecordWriter::create(&output_path, format)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;

    tracing::info!(
        start_page = range.start_page,
        page_limit = range.page_limit,
        "Scraping {} into {}",
        source.base_url(),
        output_path.display()
    );

    let t0 = Instant::now();
    let pb = spinner(cli.quiet);
    let records = source.traverse(range);
    pin_mut!(records);

    let mut written = 0usize;
    while let Some(record) = records.next().await {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                pb.abandon_with_message(format!("Stopped after {} records", written));
                return Err(e).with_context(|| {
                    format!(
                        "Scrape stopped after {} records ({} keeps them)",
                        written,
                        output_path.display()
                    )
                });
            }
        };

        writer.write(&record)?;
        written += 1;
        pb.set_message(format!("{} records written", written));
    }

    writer.into_inner()?;
    pb.finish_and_clear();

    if !cli.quiet {
        println!(
            "Wrote {} records to {} in {:.1}s",
            written,
            output_path.display(),
            t0.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
