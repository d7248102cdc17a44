//! The manifest entry: one [`PatentRecord`] per crawled patent.

use serde::{Deserialize, Serialize};

/// Everything the pipeline learned about one patent.
///
/// This is both the manifest entry and the value printed to stdout after a
/// run. Field order matters only cosmetically: it is the order a human
/// reading `manifest.json` expects, from identity to derived artefacts.
///
/// Optional fields stay `None` when every extraction heuristic missed —
/// a partial record is a valid outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentRecord {
    /// The patent page URL this record was crawled from.
    pub page_url: String,
    /// Identifier captured from the URL path; `"patent"` when no pattern
    /// matched. Doubles as the manifest key and the per-patent directory
    /// name, so it is restricted to ASCII alphanumerics by construction.
    pub patent_id: String,
    /// Patent title, if any heuristic found one.
    pub title: Option<String>,
    /// Patent abstract. `abstract` is a Rust keyword, hence the rename.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Absolute URL of the patent PDF, if a link was found on the page.
    pub pdf_url: Option<String>,
    /// Local path of the downloaded PDF.
    pub pdf_local_path: Option<String>,
    /// Rendered page images in page order; one entry per PDF page, empty
    /// when no PDF was downloaded.
    #[serde(default)]
    pub images_from_pdf: Vec<String>,
}

impl PatentRecord {
    /// A record containing only what is known before any network call.
    pub fn new(page_url: impl Into<String>, patent_id: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            patent_id: patent_id.into(),
            title: None,
            abstract_text: None,
            pdf_url: None,
            pdf_local_path: None,
            images_from_pdf: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_with_abstract_key_and_nulls() {
        let record = PatentRecord::new(
            "https://patents.google.com/patent/US123/en",
            "US123",
        );
        let json = serde_json::to_string_pretty(&record).unwrap();
        assert!(json.contains("\"abstract\": null"), "got: {json}");
        assert!(!json.contains("abstract_text"));
        assert!(json.contains("\"images_from_pdf\": []"));
    }

    #[test]
    fn non_ascii_survives_round_trip_unescaped() {
        let mut record = PatentRecord::new("https://example.com", "EP001");
        record.title = Some("Vorrichtung zur Prüfung".to_string());
        let json = serde_json::to_string_pretty(&record).unwrap();
        // serde_json writes UTF-8 literally, no \u escapes.
        assert!(json.contains("Prüfung"), "got: {json}");
        let back: PatentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn missing_images_field_defaults_to_empty() {
        let json = r#"{
            "page_url": "u",
            "patent_id": "p",
            "title": null,
            "abstract": null,
            "pdf_url": null,
            "pdf_local_path": null
        }"#;
        let record: PatentRecord = serde_json::from_str(json).unwrap();
        assert!(record.images_from_pdf.is_empty());
    }
}
