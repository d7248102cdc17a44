//! The end-to-end crawl for a single patent URL.
//!
//! Composes the pipeline stages in order: fetch the page, run the metadata
//! probes, download the PDF (if a link was found), rasterise it, and return
//! the assembled [`PatentRecord`]. Manifest handling stays with the caller —
//! the record is the unit of work; where it is persisted is the caller's
//! business (the CLI appends it to `<base>/manifest.json`).
//!
//! A page with no discoverable PDF link is not an error: the record simply
//! ships without `pdf_local_path` and with an empty `images_from_pdf`.

use crate::config::{CrawlConfig, IMAGES_SUBDIR, PDF_FILE, PDF_SUBDIR};
use crate::error::CrawlError;
use crate::pipeline::{ensure_dir, extract, fetch, render};
use crate::record::PatentRecord;
use std::time::Instant;
use tracing::{info, warn};

/// Crawl one patent page into a [`PatentRecord`].
///
/// # Errors
/// Returns `Err(CrawlError)` only for fatal conditions: the page fetch or
/// PDF download failing (transport error or non-success status), the PDF
/// failing to open, a page failing to rasterise, or local I/O failing.
/// Missing metadata never fails the crawl.
pub async fn crawl(url: &str, config: &CrawlConfig) -> Result<PatentRecord, CrawlError> {
    let start = Instant::now();
    info!("Starting crawl: {url}");

    // ── Step 1: Layout ───────────────────────────────────────────────────
    ensure_dir(&config.base_dir)?;
    let patent_id = extract::patent_id_from_url(url);
    let patent_dir = config.base_dir.join(&patent_id);
    ensure_dir(&patent_dir)?;

    // ── Step 2: Fetch page ───────────────────────────────────────────────
    let client = fetch::http_client(config)?;
    let html = fetch::fetch_page(&client, url, config).await?;

    // ── Step 3: Extract metadata ─────────────────────────────────────────
    let meta = extract::extract_page_meta(&html, url);

    let mut record = PatentRecord::new(url, patent_id);
    record.title = meta.title;
    record.abstract_text = meta.abstract_text;
    record.pdf_url = meta.pdf_url;

    // ── Step 4: Download + rasterise ─────────────────────────────────────
    if let Some(ref pdf_url) = record.pdf_url {
        let pdf_path = fetch::download_file(
            &client,
            pdf_url,
            &patent_dir.join(PDF_SUBDIR),
            Some(PDF_FILE),
            config,
        )
        .await?;

        let images =
            render::rasterize_pdf(&pdf_path, &patent_dir.join(IMAGES_SUBDIR), config).await?;

        record.pdf_local_path = Some(pdf_path.display().to_string());
        record.images_from_pdf = images
            .into_iter()
            .map(|p| p.display().to_string())
            .collect();
    } else {
        warn!("No PDF link found on {url}; record will be partial");
    }

    info!(
        "Crawl finished for '{}' in {}ms ({} page image(s))",
        record.patent_id,
        start.elapsed().as_millis(),
        record.images_from_pdf.len()
    );

    Ok(record)
}
