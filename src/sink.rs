use crate::models::Listing;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Output folder names under each site directory
const JSON_DIR: &str = "apartments_json";
const CSV_DIR: &str = "apartments_csv";

/// CSV column headers, in record-field order
const CSV_HEADER: [&str; 4] = ["Source", "Title", "Location", "Phone"];

/// Writes batches of listings under a per-site data directory.
///
/// Every output directory is created once at construction, so pipelines never
/// probe the filesystem mid-run.
pub struct RecordSink {
    json_dir: PathBuf,
    csv_dir: Option<PathBuf>,
}

impl RecordSink {
    /// Sink for pipelines that emit a single aggregate JSON file
    pub fn json_only(root: &Path, site: &str) -> Result<Self> {
        Self::create(root, site, false)
    }

    /// Sink for pipelines that emit JSON and CSV per page
    pub fn json_and_csv(root: &Path, site: &str) -> Result<Self> {
        Self::create(root, site, true)
    }

    fn create(root: &Path, site: &str, with_csv: bool) -> Result<Self> {
        let site_dir = root.join(site);
        let json_dir = site_dir.join(JSON_DIR);
        fs::create_dir_all(&json_dir)
            .with_context(|| format!("Failed to create {}", json_dir.display()))?;

        let csv_dir = if with_csv {
            let csv_dir = site_dir.join(CSV_DIR);
            fs::create_dir_all(&csv_dir)
                .with_context(|| format!("Failed to create {}", csv_dir.display()))?;
            Some(csv_dir)
        } else {
            None
        };

        Ok(Self { json_dir, csv_dir })
    }

    /// Write records as a pretty-printed JSON array
    pub fn write_json(&self, file_name: &str, records: &[Listing]) -> Result<PathBuf> {
        let path = self.json_dir.join(file_name);
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write records as CSV with display column headers
    pub fn write_csv(&self, file_name: &str, records: &[Listing]) -> Result<PathBuf> {
        let csv_dir = self
            .csv_dir
            .as_ref()
            .context("CSV output is not configured for this sink")?;
        let path = csv_dir.join(file_name);
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(CSV_HEADER)?;
        for record in records {
            writer.write_record([
                &record.source,
                &record.title,
                &record.location,
                &record.phone,
            ])?;
        }
        writer.flush()?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Listing> {
        vec![
            Listing {
                source: "https://example.com/".to_string(),
                title: "Oak Tower".to_string(),
                location: "123 Main St, Chicago".to_string(),
                phone: "555-0100".to_string(),
            },
            Listing::unavailable("https://example.com/"),
        ]
    }

    #[test]
    fn directories_exist_before_any_write() {
        let root = tempfile::tempdir().unwrap();
        let _sink = RecordSink::json_and_csv(root.path(), "example.com").unwrap();
        assert!(root.path().join("example.com/apartments_json").is_dir());
        assert!(root.path().join("example.com/apartments_csv").is_dir());
    }

    #[test]
    fn json_is_a_pretty_array_with_from_key() {
        let root = tempfile::tempdir().unwrap();
        let sink = RecordSink::json_and_csv(root.path(), "example.com").unwrap();

        let path = sink.write_json("page1.json", &sample()).unwrap();
        assert_eq!(
            path,
            root.path().join("example.com/apartments_json/page1.json")
        );

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'), "expected pretty-printed output");

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["from"], "https://example.com/");
        assert_eq!(records[1]["phone"], "N/A");
    }

    #[test]
    fn csv_has_display_headers_and_one_row_per_record() {
        let root = tempfile::tempdir().unwrap();
        let sink = RecordSink::json_and_csv(root.path(), "example.com").unwrap();

        let path = sink.write_csv("page1.csv", &sample()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("Source,Title,Location,Phone"));
        let first = lines.next().unwrap();
        assert!(first.contains("Oak Tower"));
        assert!(first.contains("\"123 Main St, Chicago\""));
        assert_eq!(lines.next().unwrap(), "https://example.com/,N/A,N/A,N/A");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn json_only_sink_rejects_csv_writes() {
        let root = tempfile::tempdir().unwrap();
        let sink = RecordSink::json_only(root.path(), "example.com").unwrap();

        assert!(sink.write_csv("page1.csv", &sample()).is_err());
        assert!(!root.path().join("example.com/apartments_csv").exists());
    }
}
