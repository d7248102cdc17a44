//! # patent2png
//!
//! Crawl a patent's web page, download the linked PDF, and rasterise every
//! page to a PNG — with a JSON manifest so finished patents are never
//! re-processed.
//!
//! ## Why this crate?
//!
//! Patent PDFs are mostly scanned drawings and dense typeset claims; the
//! page images, not the text layer, are what downstream tooling (vision
//! models, figure search, datasets) wants. This crate does the whole round
//! trip for one patent: scrape the bibliographic metadata off the page,
//! fetch the PDF, and turn it into a folder of page images.
//!
//! ## Pipeline Overview
//!
//! ```text
//! patent URL
//!  │
//!  ├─ 1. Fetch     GET the patent page HTML
//!  ├─ 2. Extract   title / abstract / PDF link via fallback probes
//!  ├─ 3. Download  stream the PDF to disk (skipped when already present)
//!  ├─ 4. Render    rasterise pages via pdfium (CPU-bound, spawn_blocking)
//!  └─ 5. Persist   append the record to the JSON manifest
//! ```
//!
//! Everything runs sequentially; the only long-running local work (pdfium
//! rendering) is moved to a blocking-pool thread.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use patent2png::{crawl, CrawlConfig, Manifest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CrawlConfig::default();
//!     let mut manifest = Manifest::load(config.manifest_path());
//!
//!     let record = crawl("https://patents.google.com/patent/US10362384B2/en", &config).await?;
//!     println!("{}", serde_json::to_string_pretty(&record)?);
//!
//!     manifest.insert(record);
//!     manifest.save()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Idempotence
//!
//! Existing files are the cache: a second run of the same patent performs no
//! PDF download and no page renders, and the manifest never gains a
//! duplicate entry. Pass [`CachePolicy::Refresh`] to overwrite local
//! artefacts instead.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `patent2png` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod crawl;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod progress;
pub mod record;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CachePolicy, CrawlConfig, CrawlConfigBuilder};
pub use crawl::crawl;
pub use error::CrawlError;
pub use manifest::Manifest;
pub use progress::{CrawlProgressCallback, NoopProgressCallback, ProgressCallback};
pub use record::PatentRecord;
