//! Pipeline stages for the patent crawl.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an
//! implementation (e.g. a different rendering backend) without touching the
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! URL ──▶ fetch ──▶ extract ──▶ fetch ──▶ render
//!         (page)    (probes)   (PDF)     (pdfium)
//! ```
//!
//! 1. [`fetch`]   — GET the patent page; later, stream the PDF to disk with
//!    the existence-as-cache short-circuit
//! 2. [`extract`] — patent-id pattern plus the ordered-fallback probes for
//!    title, abstract and PDF link
//! 3. [`render`]  — rasterise every page to `page_<n>.png`; runs in
//!    `spawn_blocking` because pdfium is not async-safe

pub mod extract;
pub mod fetch;
pub mod render;

use crate::error::CrawlError;
use std::path::Path;

/// Guarantee `path` exists as a directory, creating parents as needed.
///
/// No-op when the directory already exists; never fails on a pre-existing
/// one (`create_dir_all` semantics).
pub fn ensure_dir(path: &Path) -> Result<(), CrawlError> {
    std::fs::create_dir_all(path).map_err(|source| CrawlError::CreateDirFailed {
        path: path.to_path_buf(),
        source,
    })
}
