//! Metadata extraction: patent id, title, abstract and PDF link.
//!
//! Patent-listing pages vary in markup across eras and templates, so every
//! field is derived through an ordered cascade of independent probes, each a
//! pure function returning `Option<String>`, combined by first-some. A probe
//! that finds nothing is not an error — the cascade falls through, and when
//! every probe misses the field simply stays absent in the record.
//!
//! The PDF-link cascade resolves all candidates against the page URL. The
//! hosting-domain heuristic only ever matches absolute URLs, for which
//! `Url::join` is a no-op, so uniform resolution costs nothing there and
//! fixes the relative-href case.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Identifier used when the URL carries no recognisable patent id.
pub const FALLBACK_PATENT_ID: &str = "patent";

/// Hosting domain whose links are treated as PDF sources even when the
/// anchor text and extension heuristics both miss.
const PDF_HOST: &str = "patentimages.storage.googleapis.com";

static PATENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/patent/([A-Za-z0-9]+)").expect("patent id pattern is valid"));

static SEL_TITLE_CLASS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".patent-title").expect("valid selector"));
static SEL_META_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="DC.title"]"#).expect("valid selector"));
static SEL_DOC_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("valid selector"));
static SEL_META_ABSTRACT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="DC.description"]"#).expect("valid selector"));
static SEL_CLASSED: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[class]").expect("valid selector"));
static SEL_ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));

/// The three optional fields the page can yield.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    /// Absolute URL of the patent PDF.
    pub pdf_url: Option<String>,
}

/// Run every probe cascade over the raw page HTML.
///
/// Parsing happens here, synchronously, so the `scraper::Html` DOM (which is
/// not `Send`) never crosses an await point in the calling pipeline.
pub fn extract_page_meta(html: &str, page_url: &str) -> PageMeta {
    let doc = Html::parse_document(html);
    let meta = PageMeta {
        title: extract_title(&doc),
        abstract_text: extract_abstract(&doc),
        pdf_url: extract_pdf_url(&doc, page_url),
    };
    if meta.title.is_none() {
        debug!("no title probe matched for {page_url}");
    }
    if meta.abstract_text.is_none() {
        debug!("no abstract probe matched for {page_url}");
    }
    if meta.pdf_url.is_none() {
        debug!("no PDF link probe matched for {page_url}");
    }
    meta
}

/// Capture the path segment after `/patent/`, else the fixed fallback.
///
/// The capture class is ASCII alphanumerics only, so the returned id is safe
/// to use as a path segment without further sanitisation.
pub fn patent_id_from_url(url: &str) -> String {
    PATENT_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| FALLBACK_PATENT_ID.to_string())
}

/// Title cascade: element with the `patent-title` class, then the
/// `DC.title` meta tag, then the document `<title>`.
pub fn extract_title(doc: &Html) -> Option<String> {
    title_from_class(doc)
        .or_else(|| title_from_meta(doc))
        .or_else(|| title_from_document(doc))
}

fn title_from_class(doc: &Html) -> Option<String> {
    doc.select(&SEL_TITLE_CLASS).next().and_then(element_text)
}

fn title_from_meta(doc: &Html) -> Option<String> {
    doc.select(&SEL_META_TITLE)
        .next()
        .and_then(|el| el.value().attr("content"))
        .and_then(non_empty)
}

fn title_from_document(doc: &Html) -> Option<String> {
    doc.select(&SEL_DOC_TITLE).next().and_then(element_text)
}

/// Abstract cascade: `DC.description` meta tag, then the first element
/// whose `class` attribute contains `abstract` case-insensitively.
pub fn extract_abstract(doc: &Html) -> Option<String> {
    abstract_from_meta(doc).or_else(|| abstract_from_class(doc))
}

fn abstract_from_meta(doc: &Html) -> Option<String> {
    doc.select(&SEL_META_ABSTRACT)
        .next()
        .and_then(|el| el.value().attr("content"))
        .and_then(non_empty)
}

fn abstract_from_class(doc: &Html) -> Option<String> {
    doc.select(&SEL_CLASSED)
        .find(|el| {
            el.value()
                .attr("class")
                .is_some_and(|c| c.to_lowercase().contains("abstract"))
        })
        .and_then(element_text)
}

/// PDF-link cascade: anchor text containing `pdf`, then href containing
/// `.pdf`, then href on the known hosting domain. Every candidate is
/// resolved against `page_url`.
pub fn extract_pdf_url(doc: &Html, page_url: &str) -> Option<String> {
    pdf_by_anchor_text(doc)
        .or_else(|| pdf_by_extension(doc))
        .or_else(|| pdf_by_hosting_domain(doc))
        .and_then(|href| resolve_href(page_url, &href))
}

fn pdf_by_anchor_text(doc: &Html) -> Option<String> {
    doc.select(&SEL_ANCHOR)
        .find(|a| {
            a.value().attr("href").is_some()
                && a.text().collect::<String>().to_lowercase().contains("pdf")
        })
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

fn pdf_by_extension(doc: &Html) -> Option<String> {
    doc.select(&SEL_ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.to_lowercase().contains(".pdf"))
        .map(str::to_string)
}

fn pdf_by_hosting_domain(doc: &Html) -> Option<String> {
    doc.select(&SEL_ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains(PDF_HOST) && href.to_lowercase().contains(".pdf"))
        .map(str::to_string)
}

/// Join `href` against the page URL; absolute hrefs pass through unchanged.
fn resolve_href(page_url: &str, href: &str) -> Option<String> {
    match Url::parse(page_url) {
        Ok(base) => base.join(href).ok().map(Into::into),
        // Unparsable base: keep the candidate only if it is absolute itself.
        Err(_) => Url::parse(href).ok().map(Into::into),
    }
}

/// Whitespace-trimmed inner text of an element, `None` when empty.
fn element_text(el: ElementRef<'_>) -> Option<String> {
    non_empty(&el.text().collect::<String>())
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
