//! Output accumulation
//!
//! Loads whatever the output file holds, coerces it to a collection, adds
//! the new record and rewrites the whole file. Records are never edited in
//! place.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, OutputMode};
use crate::record::ProfileRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} does not contain valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Load/save contract for the output document
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn exists(&self, path: &Path) -> Result<bool, StoreError>;

    /// Whole document as JSON; an empty file reads as `null`.
    async fn read_collection(&self, path: &Path) -> Result<Value, StoreError>;

    /// Replace the whole document, pretty-printed.
    async fn write_collection(&self, path: &Path, document: &Value) -> Result<(), StoreError>;
}

/// [`RecordStore`] over a JSON file on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileStore;

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn exists(&self, path: &Path) -> Result<bool, StoreError> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|e| StoreError::io(path, e))
    }

    async fn read_collection(&self, path: &Path) -> Result<Value, StoreError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        if contents.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    async fn write_collection(&self, path: &Path, document: &Value) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(document)?;
        json.push('\n');

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        // staged beside the target, then renamed over it
        let mut staging = path.as_os_str().to_owned();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        tokio::fs::write(&staging, json)
            .await
            .map_err(|e| StoreError::io(&staging, e))?;
        tokio::fs::rename(&staging, path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        Ok(())
    }
}

/// Treat any stored document as an ordered collection: arrays as-is, `null`
/// as empty, any other value as a one-element collection.
pub fn coerce_to_collection(document: Value) -> Vec<Value> {
    match document {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

pub struct OutputAccumulator<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    path: PathBuf,
    mode: OutputMode,
    dedupe_by_url: bool,
}

impl<'a, S: RecordStore + ?Sized> OutputAccumulator<'a, S> {
    pub fn new(store: &'a S, path: impl Into<PathBuf>, mode: OutputMode, dedupe_by_url: bool) -> Self {
        Self {
            store,
            path: path.into(),
            mode,
            dedupe_by_url,
        }
    }

    pub fn from_config(store: &'a S, config: &Config) -> Self {
        Self::new(
            store,
            config.output_file.clone(),
            config.output_mode,
            config.dedupe_by_url,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents as a collection; a missing file is empty.
    pub async fn load(&self) -> Result<Vec<Value>, StoreError> {
        if !self.store.exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let document = self.store.read_collection(&self.path).await?;
        if !document.is_array() && !document.is_null() {
            debug!(path = %self.path.display(), "Output holds a single record; treating it as a collection");
        }
        Ok(coerce_to_collection(document))
    }

    /// Persist `record` and return the document that was written.
    pub async fn append(&self, record: &ProfileRecord) -> Result<Value, StoreError> {
        let record = serde_json::to_value(record)?;

        let document = match self.mode {
            OutputMode::Single => record,
            OutputMode::Append => {
                let mut records = self.load().await?;
                if self.dedupe_by_url {
                    let url = record.get("sourceUrl").cloned();
                    let before = records.len();
                    records.retain(|existing| existing.get("sourceUrl") != url.as_ref());
                    if records.len() != before {
                        debug!(replaced = before - records.len(), "Dropped earlier records for the same URL");
                    }
                }
                records.push(record);
                Value::Array(records)
            }
        };

        self.store.write_collection(&self.path, &document).await?;
        info!(
            path = %self.path.display(),
            records = document.as_array().map_or(1, Vec::len),
            "Output saved"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn record(url: &str, name: &str) -> ProfileRecord {
        ProfileRecord {
            source_url: url.to_string(),
            scraped_at: Utc::now(),
            name: Some(name.to_string()),
            headline: None,
            location: None,
            about: None,
            current_company: None,
            education_top: None,
            followers_and_connections: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            activity: Vec::new(),
            certifications: Vec::new(),
            projects: Vec::new(),
            publications: Vec::new(),
            honors: Vec::new(),
            languages: Vec::new(),
            retry_count: 0,
            html_length: 4096,
        }
    }

    #[test]
    fn coercion_rules() {
        assert_eq!(coerce_to_collection(Value::Null), Vec::<Value>::new());
        assert_eq!(coerce_to_collection(json!({"a": 1})), vec![json!({"a": 1})]);
        assert_eq!(coerce_to_collection(json!([1, 2])), vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn single_object_file_becomes_two_element_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, r#"{"sourceUrl":"https://www.linkedin.com/in/old","name":"Old"}"#).unwrap();

        let acc = OutputAccumulator::new(&JsonFileStore, &path, OutputMode::Append, false);
        acc.append(&record("https://www.linkedin.com/in/new", "New")).await.unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let items = written.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "Old");
        assert_eq!(items[1]["name"], "New");
    }

    #[tokio::test]
    async fn record_survives_a_write_read_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        let original = record("https://www.linkedin.com/in/ada", "Ada");

        let acc = OutputAccumulator::new(&JsonFileStore, &path, OutputMode::Append, false);
        acc.append(&original).await.unwrap();

        let loaded = acc.load().await.unwrap();
        let back: ProfileRecord = serde_json::from_value(loaded[0].clone()).unwrap();
        assert_eq!(back, original);
        assert!(std::fs::read_to_string(&path).unwrap().contains("\n  "));
    }

    #[tokio::test]
    async fn single_mode_overwrites_with_bare_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let acc = OutputAccumulator::new(&JsonFileStore, &path, OutputMode::Single, false);
        let document = acc.append(&record("https://www.linkedin.com/in/ada", "Ada")).await.unwrap();
        assert!(document.is_object());
        assert_eq!(acc.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dedupe_replaces_records_with_same_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let url = "https://www.linkedin.com/in/ada";

        let keep_all = OutputAccumulator::new(&JsonFileStore, &path, OutputMode::Append, false);
        keep_all.append(&record(url, "First")).await.unwrap();
        keep_all.append(&record("https://www.linkedin.com/in/bob", "Bob")).await.unwrap();
        keep_all.append(&record(url, "Second")).await.unwrap();
        assert_eq!(keep_all.load().await.unwrap().len(), 3);

        let dedupe = OutputAccumulator::new(&JsonFileStore, &path, OutputMode::Append, true);
        let document = dedupe.append(&record(url, "Third")).await.unwrap();
        let names: Vec<&str> = document
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Bob", "Third"]);
    }

    #[tokio::test]
    async fn invalid_json_is_an_error_and_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "{ not json").unwrap();

        let acc = OutputAccumulator::new(&JsonFileStore, &path, OutputMode::Append, false);
        let err = acc.append(&record("https://www.linkedin.com/in/ada", "Ada")).await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
