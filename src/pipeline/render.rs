//! PDF rasterisation: render every page to `page_<n>.png` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! blocking-pool thread so the async caller is never stalled mid-render.
//!
//! ## Page naming and the skip rule
//!
//! Pages are processed 0-based but named 1-based: `page_1.png` is the first
//! page. A page whose image file already exists is not re-rendered under
//! `ReuseExisting` — but its path is still recorded, so the returned list
//! always has exactly one entry per document page, in document order.

use crate::config::{CachePolicy, CrawlConfig};
use crate::error::CrawlError;
use crate::pipeline::ensure_dir;
use crate::progress::ProgressCallback;
use image::ImageFormat;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Image filename for a 1-based page number.
pub(crate) fn page_filename(page_num: usize) -> String {
    format!("page_{page_num}.png")
}

/// Rasterise every page of `pdf_path` into `out_dir`.
///
/// Returns the ordered list of image paths, one per page, whether freshly
/// rendered or reused from a previous run.
pub async fn rasterize_pdf(
    pdf_path: &Path,
    out_dir: &Path,
    config: &CrawlConfig,
) -> Result<Vec<PathBuf>, CrawlError> {
    ensure_dir(out_dir)?;

    let pdf_path = pdf_path.to_path_buf();
    let out_dir = out_dir.to_path_buf();
    let scale = config.render_scale;
    let cache = config.cache;
    let progress = config.progress_callback.clone();

    tokio::task::spawn_blocking(move || {
        rasterize_blocking(&pdf_path, &out_dir, scale, cache, progress)
    })
    .await
    .map_err(|e| CrawlError::Internal(format!("Render task panicked: {e}")))?
}

/// Blocking implementation of page rasterisation.
fn rasterize_blocking(
    pdf_path: &Path,
    out_dir: &Path,
    scale: f32,
    cache: CachePolicy,
    progress: Option<ProgressCallback>,
) -> Result<Vec<PathBuf>, CrawlError> {
    let pdfium = Pdfium::default();

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| CrawlError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {total_pages} pages");

    if let Some(ref cb) = progress {
        cb.on_render_start(total_pages);
    }

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    let mut images = Vec::with_capacity(total_pages);
    let mut rendered = 0usize;

    for idx in 0..total_pages {
        let page_num = idx + 1;
        let image_path = out_dir.join(page_filename(page_num));

        if cache.reuse(&image_path) {
            debug!("Reusing existing image: {}", image_path.display());
            images.push(image_path);
            if let Some(ref cb) = progress {
                cb.on_page_done(page_num, total_pages, true);
            }
            continue;
        }

        let page = pages
            .get(idx as u16)
            .map_err(|e| CrawlError::RasterisationFailed {
                page: page_num,
                detail: format!("{e:?}"),
            })?;

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| CrawlError::RasterisationFailed {
                    page: page_num,
                    detail: format!("{e:?}"),
                })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {page_num} → {}x{} px",
            image.width(),
            image.height()
        );

        image
            .save_with_format(&image_path, ImageFormat::Png)
            .map_err(|e| CrawlError::ImageWriteFailed {
                page: page_num,
                path: image_path.clone(),
                detail: e.to_string(),
            })?;

        rendered += 1;
        if let Some(ref cb) = progress {
            cb.on_page_done(page_num, total_pages, false);
        }
        images.push(image_path);
    }

    if let Some(ref cb) = progress {
        cb.on_render_complete(total_pages, rendered);
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_filenames_are_one_based() {
        assert_eq!(page_filename(1), "page_1.png");
        assert_eq!(page_filename(12), "page_12.png");
    }
}
