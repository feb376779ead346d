// src/feed/models.rs
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::error::FeedError;

/// Document link as published by the open-data portal: either a bare URL
/// or a `{ "url": ... }` link object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedUrl {
    Plain(String),
    Link { url: String },
}

impl FeedUrl {
    pub fn as_str(&self) -> &str {
        match self {
            FeedUrl::Plain(url) | FeedUrl::Link { url } => url,
        }
    }
}

/// One council meeting in the disposition feed.
/// Example: https://data.winnipeg.ca/resource/hsbq-sj6t.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub meeting_date: String, // e.g. "2020-01-30T00:00:00.000"
    #[serde(rename = "type", alias = "meeting_type")]
    pub meeting_type: String, // e.g. "Regular Meeting"
    #[serde(alias = "disposition", alias = "document")]
    pub url: FeedUrl,
}

impl FeedEntry {
    /// `YYYY-MM-DD` part of the meeting timestamp.
    pub fn iso_date(&self) -> &str {
        self.meeting_date.get(..10).unwrap_or(&self.meeting_date)
    }

    /// Local file name for the meeting's disposition document.
    pub fn file_name(&self) -> String {
        format!("DISPOSITION-{}.docx", self.iso_date())
    }

    pub fn is_regular(&self) -> bool {
        self.meeting_type.to_lowercase().contains("regular")
    }

    pub fn is_special(&self) -> bool {
        self.meeting_type.to_lowercase().contains("special")
    }
}

#[derive(Debug, Clone)]
pub struct DispositionFeed {
    entries: Vec<FeedEntry>,
}

impl DispositionFeed {
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        let entries: Vec<FeedEntry> = serde_json::from_str(json)?;
        tracing::debug!("Parsed disposition feed with {} entries", entries.len());
        Ok(Self { entries })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FeedError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn regular_dispositions(&self) -> Vec<&FeedEntry> {
        self.entries.iter().filter(|e| e.is_regular()).collect()
    }

    pub fn special_dispositions(&self) -> Vec<&FeedEntry> {
        self.entries.iter().filter(|e| e.is_special()).collect()
    }
}
