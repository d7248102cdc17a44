//! Configuration for a patent crawl.
//!
//! Every knob lives in one [`CrawlConfig`] struct built through
//! [`CrawlConfigBuilder`]. Keeping the base directory and manifest location
//! here — rather than as process-wide defaults — is what lets the tests run
//! against throwaway temp directories.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults for
//! the rest; new fields never break existing call sites.

use crate::error::CrawlError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Manifest filename inside the base directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Fixed name of the downloaded PDF inside `<patent_dir>/pdf/`.
pub const PDF_FILE: &str = "patent.pdf";

/// Per-patent subdirectory holding the downloaded PDF.
pub const PDF_SUBDIR: &str = "pdf";

/// Per-patent subdirectory holding the rendered page images.
pub const IMAGES_SUBDIR: &str = "pdf_images";

/// Configuration for [`crate::crawl::crawl`].
///
/// # Example
/// ```rust
/// use patent2png::CrawlConfig;
///
/// let config = CrawlConfig::builder()
///     .base_dir("downloads")
///     .render_scale(2.0)
///     .http_timeout_secs(60)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CrawlConfig {
    /// Root of the on-disk layout. Default: `downloads`.
    ///
    /// Everything the crawl writes lives under here:
    /// `<base>/manifest.json`, `<base>/<patent_id>/pdf/patent.pdf`,
    /// `<base>/<patent_id>/pdf_images/page_<n>.png`.
    pub base_dir: PathBuf,

    /// Scale factor applied to each page's native resolution when
    /// rasterising. Range: 0.5–8.0. Default: 2.0.
    ///
    /// 2.0 doubles the page's point size in pixels, sharp enough for OCR
    /// and figure inspection without producing multi-hundred-megapixel
    /// images for oversize drawings.
    pub render_scale: f32,

    /// Timeout applied to every HTTP request (page fetch and PDF download),
    /// in seconds. Default: 120.
    pub http_timeout_secs: u64,

    /// `User-Agent` header for outbound requests. `None` uses the reqwest
    /// default.
    pub user_agent: Option<String>,

    /// What to do when a destination file already exists. Default:
    /// [`CachePolicy::ReuseExisting`].
    pub cache: CachePolicy,

    /// Optional observer for per-page rasterisation events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("downloads"),
            render_scale: 2.0,
            http_timeout_secs: 120,
            user_agent: None,
            cache: CachePolicy::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CrawlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlConfig")
            .field("base_dir", &self.base_dir)
            .field("render_scale", &self.render_scale)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("cache", &self.cache)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn CrawlProgressCallback>"),
            )
            .finish()
    }
}

impl CrawlConfig {
    /// Create a new builder for `CrawlConfig`.
    pub fn builder() -> CrawlConfigBuilder {
        CrawlConfigBuilder {
            config: Self::default(),
        }
    }

    /// Path of the JSON manifest inside the base directory.
    pub fn manifest_path(&self) -> PathBuf {
        self.base_dir.join(MANIFEST_FILE)
    }
}

/// Builder for [`CrawlConfig`].
#[derive(Debug)]
pub struct CrawlConfigBuilder {
    config: CrawlConfig,
}

impl CrawlConfigBuilder {
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = dir.into();
        self
    }

    pub fn render_scale(mut self, scale: f32) -> Self {
        self.config.render_scale = scale.clamp(0.5, 8.0);
        self
    }

    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs.max(1);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    pub fn cache(mut self, policy: CachePolicy) -> Self {
        self.config.cache = policy;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CrawlConfig, CrawlError> {
        let c = &self.config;
        if !(0.5..=8.0).contains(&c.render_scale) {
            return Err(CrawlError::InvalidConfig(format!(
                "render scale must be 0.5–8.0, got {}",
                c.render_scale
            )));
        }
        if c.http_timeout_secs == 0 {
            return Err(CrawlError::InvalidConfig("HTTP timeout must be ≥ 1s".into()));
        }
        Ok(self.config)
    }
}

/// What to do when a download or render target already exists on disk.
///
/// The default is `ReuseExisting`: the presence of the file is
/// the cache, so re-running a crawl performs zero network calls for the PDF
/// and zero re-renders for the images. `Refresh` overwrites unconditionally,
/// which is how the CLI's `--refresh` flag (and the tests) force fresh
/// artefacts without deleting anything first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CachePolicy {
    /// Skip work whose output file already exists. (default)
    #[default]
    ReuseExisting,
    /// Always re-download / re-render, overwriting existing files.
    Refresh,
}

impl CachePolicy {
    /// True when `path` should be kept as-is instead of being regenerated.
    pub fn reuse(&self, path: &Path) -> bool {
        matches!(self, CachePolicy::ReuseExisting) && path.exists()
    }
}
