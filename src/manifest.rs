//! The JSON manifest of prior crawl results.
//!
//! A flat array of [`PatentRecord`]s, unique by `patent_id`, loaded once at
//! startup and written back whole at the end of the run. Loading is
//! best-effort on purpose: a missing file means "no history yet", and an
//! unparsable file is treated the same way — forward progress beats strict
//! error reporting here — except that corruption is worth a warning, since
//! silently equating the two loses real information.
//!
//! Saving goes through a temp file in the manifest's directory followed by a
//! rename, so a crash mid-write leaves the previous manifest intact rather
//! than a truncated one.

use crate::error::CrawlError;
use crate::record::PatentRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// In-memory view of the manifest file.
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    records: Vec<PatentRecord>,
}

impl Manifest {
    /// Load the manifest at `path`.
    ///
    /// A missing file yields an empty manifest. A file that exists but does
    /// not parse as a record array also yields an empty manifest, with a
    /// warning — the crawl proceeds either way.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<PatentRecord>>(&contents) {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        "Manifest '{}' is not valid JSON ({e}); starting with empty history",
                        path.display()
                    );
                    Vec::new()
                }
            },
            Err(_) => {
                debug!("No manifest at '{}'; starting fresh", path.display());
                Vec::new()
            }
        };
        Self { path, records }
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[PatentRecord] {
        &self.records
    }

    /// Whether a record with this `patent_id` is already present.
    pub fn contains(&self, patent_id: &str) -> bool {
        self.records.iter().any(|r| r.patent_id == patent_id)
    }

    /// Append `record` unless its `patent_id` is already present.
    ///
    /// First occurrence wins; returns whether the record was appended.
    pub fn insert(&mut self, record: PatentRecord) -> bool {
        if self.contains(&record.patent_id) {
            debug!("Manifest already has '{}'; not appending", record.patent_id);
            return false;
        }
        self.records.push(record);
        true
    }

    /// Write the full record list back as pretty-printed JSON.
    ///
    /// The write lands in a temp file next to the target and is renamed over
    /// it, so readers never observe a partially written manifest.
    pub fn save(&self) -> Result<(), CrawlError> {
        let json = serde_json::to_string_pretty(&self.records).map_err(|e| {
            CrawlError::Internal(format!("Failed to serialise manifest: {e}"))
        })?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| {
            CrawlError::WriteFailed {
                path: self.path.clone(),
                source,
            }
        })?;
        std::io::Write::write_all(&mut tmp, json.as_bytes()).map_err(|source| {
            CrawlError::WriteFailed {
                path: self.path.clone(),
                source,
            }
        })?;
        tmp.persist(&self.path)
            .map_err(|e| CrawlError::WriteFailed {
                path: self.path.clone(),
                source: e.error,
            })?;

        debug!(
            "Saved manifest with {} record(s) to '{}'",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> PatentRecord {
        PatentRecord::new(format!("https://patents.google.com/patent/{id}/en"), id)
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::load(dir.path().join("manifest.json"));
        assert!(manifest.records().is_empty());
    }

    #[test]
    fn corrupted_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, b"{not json").unwrap();

        let manifest = Manifest::load(&path);
        assert!(manifest.records().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");

        let mut manifest = Manifest::load(&path);
        let mut record = sample("US111");
        record.title = Some("Example — Prüfung".to_string());
        assert!(manifest.insert(record.clone()));
        manifest.save().unwrap();

        // Pretty-printed with 2-space indent, non-ASCII literal.
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {"), "got: {raw}");
        assert!(raw.contains("Prüfung"));

        let reloaded = Manifest::load(&path);
        assert_eq!(reloaded.records(), &[record]);
    }

    #[test]
    fn duplicate_patent_ids_are_never_appended() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = Manifest::load(dir.path().join("manifest.json"));

        assert!(manifest.insert(sample("US111")));
        assert!(manifest.insert(sample("US222")));

        // Same id, different page URL: first occurrence wins.
        let mut dup = sample("US111");
        dup.page_url = "https://patents.google.com/patent/US111/de".to_string();
        assert!(!manifest.insert(dup));

        assert_eq!(manifest.records().len(), 2);
        assert_eq!(
            manifest.records()[0].page_url,
            "https://patents.google.com/patent/US111/en"
        );
    }

    #[test]
    fn duplicates_survive_save_load_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");

        let mut manifest = Manifest::load(&path);
        manifest.insert(sample("US111"));
        manifest.save().unwrap();

        let mut second_run = Manifest::load(&path);
        assert!(second_run.contains("US111"));
        assert!(!second_run.insert(sample("US111")));
        second_run.save().unwrap();

        assert_eq!(Manifest::load(&path).records().len(), 1);
    }
}
