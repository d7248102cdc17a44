//! Error types for the patent2png library.
//!
//! The crawl has exactly three outcome classes, and only one of them is an
//! error:
//!
//! * **Fatal** — the run cannot produce a record at all (page fetch failed,
//!   PDF download failed, a file could not be written). These are the
//!   [`CrawlError`] variants below, returned as `Err` from
//!   [`crate::crawl::crawl`].
//!
//! * **Recovered** — a metadata probe found nothing, or the manifest on disk
//!   was missing or unparsable. These never surface as `Err`: probes fall
//!   through to the next heuristic and the manifest loads as empty history,
//!   with a `tracing::warn!` for the corrupt case.
//!
//! * **Idempotent skip** — the PDF or a rendered page already exists on
//!   disk. Treated as success without touching the network or pdfium.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the patent2png library.
#[derive(Debug, Error)]
pub enum CrawlError {
    // ── Network errors ────────────────────────────────────────────────────
    /// The patent page could not be fetched (transport-level failure).
    #[error("Failed to fetch page '{url}': {reason}\nCheck the URL and your internet connection.")]
    PageFetchFailed { url: String, reason: String },

    /// The server answered, but with a non-success status.
    #[error("HTTP {status} from '{url}'")]
    HttpStatus { url: String, status: u16 },

    /// The PDF (or another file) could not be downloaded.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// A network call exceeded the configured timeout.
    #[error("Request timed out after {secs}s for '{url}'\nIncrease --timeout.")]
    RequestTimeout { url: String, secs: u64 },

    /// The HTTP client itself could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuildFailed(String),

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not open the downloaded document.
    #[error("PDF '{path}' could not be opened: {detail}\nThe download may be truncated; re-run with --refresh.")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// A rendered page could not be encoded or saved as PNG.
    #[error("Failed to write image for page {page} to '{path}': {detail}")]
    ImageWriteFailed {
        page: usize,
        path: PathBuf,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// A directory could not be created.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file (downloaded PDF, manifest) could not be written.
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a blocking task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}
