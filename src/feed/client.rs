// src/feed/client.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header;

use crate::feed::models::{DispositionFeed, FeedEntry};
use crate::utils::error::{AppError, FeedError};

pub const DEFAULT_FEED_URL: &str = "https://data.winnipeg.ca/resource/hsbq-sj6t.json";
/// Overrides `DEFAULT_FEED_URL` when set.
pub const FEED_URL_ENV: &str = "DISPOSITION_FEED_URL";

const USER_AGENT: &str = concat!("disposition_scraper/", env!("CARGO_PKG_VERSION"));
// Be polite to the open-data portal.
const REQUEST_DELAY_MS: u64 = 150;

/// Feed URL from the command line, the environment, or the default.
/// A blank value from either source is a configuration error.
pub fn feed_url(cli_value: Option<&str>) -> Result<String, AppError> {
    feed_url_from(cli_value, std::env::var(FEED_URL_ENV).ok().as_deref())
}

fn feed_url_from(cli_value: Option<&str>, env_value: Option<&str>) -> Result<String, AppError> {
    let (source, url) = match (cli_value, env_value) {
        (Some(url), _) => ("--feed-url", url),
        (None, Some(url)) => (FEED_URL_ENV, url),
        (None, None) => return Ok(DEFAULT_FEED_URL.to_string()),
    };

    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::Config(format!("{} is set but empty", source)));
    }
    Ok(url.to_string())
}

/// Creates a reqwest client configured for the open-data portal.
fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(60))
        .build()
}

async fn get(url: &str, accept: &str) -> Result<reqwest::Response, FeedError> {
    let client = build_client()?;

    tokio::time::sleep(Duration::from_millis(REQUEST_DELAY_MS)).await;

    let response = client
        .get(url)
        .header(header::ACCEPT, accept)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        return Err(FeedError::Http(status));
    }
    Ok(response)
}

/// Downloads and parses the disposition feed.
pub async fn download_feed(url: &str) -> Result<DispositionFeed, FeedError> {
    tracing::info!("Downloading disposition feed from: {}", url);
    let body = get(url, "application/json").await?.text().await?;
    tracing::debug!("Downloaded feed ({} bytes)", body.len());
    DispositionFeed::from_json(&body)
}

/// Downloads one disposition document.
pub async fn download_document(url: &str) -> Result<Vec<u8>, FeedError> {
    tracing::info!("Downloading document from: {}", url);
    let bytes = get(url, "*/*").await?.bytes().await?;
    tracing::debug!("Successfully downloaded {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}

#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// List what would be downloaded without fetching anything.
    pub test_mode: bool,
    /// Keep files that already exist instead of downloading them again.
    pub latest_only: bool,
    pub folder: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadAction {
    Download { url: String, target: PathBuf },
    SkipExisting { target: PathBuf },
}

/// Decides, per feed entry, whether its document needs downloading.
pub fn plan_downloads(entries: &[&FeedEntry], options: &DownloadOptions) -> Vec<DownloadAction> {
    entries
        .iter()
        .map(|entry| {
            let target = options.folder.join(entry.file_name());
            if options.latest_only && target.exists() {
                DownloadAction::SkipExisting { target }
            } else {
                DownloadAction::Download {
                    url: entry.url.as_str().to_string(),
                    target,
                }
            }
        })
        .collect()
}

/// Downloads the regular meeting dispositions listed in `feed` into
/// `options.folder`. Returns the files written.
pub async fn download_dispositions(
    feed: &DispositionFeed,
    options: &DownloadOptions,
) -> Result<Vec<PathBuf>, FeedError> {
    let regular = feed.regular_dispositions();
    let plan = plan_downloads(&regular, options);

    if options.test_mode {
        tracing::info!("Test mode: no downloads");
    }

    let mut written = Vec::new();
    for action in plan {
        match action {
            DownloadAction::SkipExisting { target } => {
                tracing::info!("Skipping existing copy of {}", target.display());
            }
            DownloadAction::Download { url, target } => {
                tracing::info!("Downloading {}", target.display());
                if options.test_mode {
                    continue;
                }
                let bytes = download_document(&url).await?;
                save(&target, &bytes).await?;
                written.push(target);
            }
        }
    }

    Ok(written)
}

async fn save(target: &Path, bytes: &[u8]) -> Result<(), FeedError> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, bytes).await?;
    Ok(())
}
