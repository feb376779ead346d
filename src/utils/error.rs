// src/utils/error.rs
use thiserror::Error;

use crate::extractors::section::Section;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid docx container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid document XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Document part not found: {0}")]
    MissingPart(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{section}: row {row} has {found} columns, expected at least {expected} (missing '{missing}')")]
    ColumnCountMismatch {
        section: Section,
        row: usize,
        expected: usize,
        found: usize,
        missing: &'static str,
    },

    #[error("{section}: row {row} column {column} holds {found}, but {expected} was read")]
    FieldMismatch {
        section: Section,
        row: usize,
        column: usize,
        expected: String,
        found: String,
    },

    #[error("{section}: could not parse a date from '{text}'")]
    UnparseableEmbeddedDate { section: Section, text: String },

    #[error("{section}: heading does not have the expected shape: '{heading}'")]
    MalformedHeading { section: Section, heading: String },
}

impl ExtractError {
    /// The section whose table produced the error.
    pub fn section(&self) -> Section {
        match self {
            ExtractError::ColumnCountMismatch { section, .. }
            | ExtractError::FieldMismatch { section, .. }
            | ExtractError::UnparseableEmbeddedDate { section, .. }
            | ExtractError::MalformedHeading { section, .. } => *section,
        }
    }
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 403 Forbidden

    #[error("Failed to parse disposition feed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Document loading failed: {0}")]
    Document(#[from] DocumentError),

    #[error("Disposition feed failed: {0}")]
    Feed(#[from] FeedError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
