//! Progress-callback trait for per-page rasterisation events.
//!
//! Rasterising a long patent PDF is the only operation here that keeps the
//! process busy for more than a moment, so the callback surface is limited
//! to that stage. Inject an [`Arc<dyn CrawlProgressCallback>`] via
//! [`crate::config::CrawlConfigBuilder::progress_callback`]; the CLI uses it
//! to drive an indicatif bar, and libraries can forward events wherever they
//! like without patent2png knowing how the host application communicates.

use std::sync::Arc;

/// Called by the render stage as it walks the document's pages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The trait is `Send + Sync` because rendering runs
/// on a blocking worker thread, not the caller's.
pub trait CrawlProgressCallback: Send + Sync {
    /// Called once after the PDF has been opened, before any page work.
    fn on_render_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page has been handled.
    ///
    /// `reused` is true when the page image already existed on disk and
    /// rendering was skipped.
    fn on_page_done(&self, page_num: usize, total_pages: usize, reused: bool) {
        let _ = (page_num, total_pages, reused);
    }

    /// Called once after every page has been handled.
    fn on_render_complete(&self, total_pages: usize, rendered: usize) {
        let _ = (total_pages, rendered);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CrawlProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CrawlConfig`].
pub type ProgressCallback = Arc<dyn CrawlProgressCallback>;
