//! CLI binary for patent2png.
//!
//! A thin shim over the library crate that maps CLI flags to `CrawlConfig`,
//! round-trips the manifest, and prints the crawled record.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use patent2png::{
    crawl, CachePolicy, CrawlConfig, CrawlProgressCallback, Manifest, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Crawled when no URL argument is given.
const DEFAULT_URL: &str = "https://patents.google.com/patent/US10362384B2/en";

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress bar for the rasterisation stage. The page count is
/// unknown until pdfium has opened the document, so the bar starts as a
/// spinner and grows a length in `on_render_start`.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Rendering");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl CrawlProgressCallback for CliProgressCallback {
    fn on_render_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_message("");
    }

    fn on_page_done(&self, page_num: usize, _total_pages: usize, reused: bool) {
        if reused {
            self.bar.set_message(format!("page {page_num} (cached)"));
        } else {
            self.bar.set_message(format!("page {page_num}"));
        }
        self.bar.inc(1);
    }

    fn on_render_complete(&self, total_pages: usize, rendered: usize) {
        self.bar.finish_and_clear();
        let reused = total_pages.saturating_sub(rendered);
        if reused == 0 {
            eprintln!(
                "{} {} pages rendered",
                green("✔"),
                bold(&rendered.to_string())
            );
        } else {
            eprintln!(
                "{} {} pages rendered, {} reused from a previous run",
                green("✔"),
                bold(&rendered.to_string()),
                reused
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Crawl the default example patent into ./downloads
  patent2png

  # Crawl a specific patent
  patent2png https://patents.google.com/patent/US10362384B2/en

  # Keep artefacts somewhere else
  patent2png --base-dir /data/patents https://patents.google.com/patent/EP1234567A1

  # Force re-download and re-render over existing files
  patent2png --refresh https://patents.google.com/patent/US10362384B2/en

OUTPUT LAYOUT (relative to --base-dir):
  manifest.json                       one record per crawled patent
  <patent_id>/pdf/patent.pdf          downloaded PDF
  <patent_id>/pdf_images/page_N.png   rendered pages, 1-based

ENVIRONMENT VARIABLES:
  PATENT2PNG_BASE_DIR     Output directory (same as --base-dir)
  PATENT2PNG_TIMEOUT      HTTP timeout in seconds (same as --timeout)
  PATENT2PNG_USER_AGENT   User-Agent header for outbound requests
  PDFIUM_LIB_PATH         Path to an existing libpdfium build

Re-running a finished patent is free: the PDF and page images are reused
from disk and the manifest gains no duplicate entry.
"#;

/// Crawl a patent page: metadata, PDF, and per-page PNG images.
#[derive(Parser, Debug)]
#[command(
    name = "patent2png",
    version,
    about = "Crawl a patent page: metadata, PDF, and per-page PNG images",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Patent page URL.
    #[arg(default_value = DEFAULT_URL)]
    url: String,

    /// Directory receiving the manifest and per-patent artefacts.
    #[arg(short = 'd', long, env = "PATENT2PNG_BASE_DIR", default_value = "downloads")]
    base_dir: PathBuf,

    /// Render scale relative to each page's native resolution (0.5–8.0).
    #[arg(long, env = "PATENT2PNG_SCALE", default_value_t = 2.0)]
    scale: f32,

    /// HTTP timeout in seconds (page fetch and PDF download).
    #[arg(long, env = "PATENT2PNG_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Re-download the PDF and re-render all pages even when files exist.
    #[arg(long, env = "PATENT2PNG_REFRESH")]
    refresh: bool,

    /// User-Agent header for outbound requests.
    #[arg(long, env = "PATENT2PNG_USER_AGENT")]
    user_agent: Option<String>,

    /// Disable the progress bar.
    #[arg(long, env = "PATENT2PNG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PATENT2PNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the record JSON and errors.
    #[arg(short, long, env = "PATENT2PNG_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs would interleave with the progress bar, so the bar
    // wins unless --verbose asks for everything.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = CrawlConfig::builder()
        .base_dir(cli.base_dir.clone())
        .render_scale(cli.scale)
        .http_timeout_secs(cli.timeout)
        .cache(if cli.refresh {
            CachePolicy::Refresh
        } else {
            CachePolicy::ReuseExisting
        });

    if let Some(ref agent) = cli.user_agent {
        builder = builder.user_agent(agent.clone());
    }
    if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Crawl ────────────────────────────────────────────────────────────
    let mut manifest = Manifest::load(config.manifest_path());

    let record = crawl(&cli.url, &config)
        .await
        .with_context(|| format!("Crawl failed for {}", cli.url))?;

    let appended = manifest.insert(record.clone());
    manifest.save().context("Failed to save manifest")?;

    // ── Report ───────────────────────────────────────────────────────────
    let json = serde_json::to_string_pretty(&record).context("Failed to serialise record")?;
    println!("{json}");

    if !cli.quiet {
        if appended {
            eprintln!(
                "{} recorded '{}' in {}",
                green("✔"),
                bold(&record.patent_id),
                dim(&config.manifest_path().display().to_string()),
            );
        } else {
            eprintln!(
                "{} '{}' was already in the manifest; artefacts refreshed on disk only",
                dim("·"),
                bold(&record.patent_id),
            );
        }
    }

    Ok(())
}
