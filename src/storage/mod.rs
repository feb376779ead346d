// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractors::models::DispositionRecord;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

/// File stem for a record: `DISPOSITION-<meeting date>`, or `fallback`
/// when the meeting date is unknown.
pub fn record_stem(record: &DispositionRecord, fallback: &str) -> String {
    match record.meeting_date {
        Some(date) => format!("DISPOSITION-{}", date.format("%Y-%m-%d")),
        None => fallback.to_string(),
    }
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Saves the record as pretty-printed JSON to `<stem>.json`
    pub fn save_record(&self, record: &DispositionRecord, stem: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}.json", stem));

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved disposition to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves rendered HTML to `<stem>.html`
    pub fn save_html(&self, html: &str, stem: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}.html", stem));

        fs::write(&file_path, html).map_err(StorageError::IoError)?;

        tracing::info!("Saved HTML to {}", file_path.display());

        Ok(file_path)
    }
}
