// src/main.rs
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use disposition_scraper::feed::client::{self, DownloadOptions};
use disposition_scraper::render;
use disposition_scraper::storage::{self, StorageManager};
use disposition_scraper::utils::{self, AppError};
use disposition_scraper::{Disposition, DispositionRecord};

/// Command Line Interface for council disposition documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract disposition records from .docx files as JSON
    Extract {
        /// Disposition documents to read
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write DISPOSITION-<date>.json files here instead of printing to stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also write an HTML rendering next to each JSON file
        #[arg(long, requires = "output_dir")]
        html: bool,
    },

    /// Download regular meeting dispositions listed in the open-data feed
    Download {
        /// Download folder
        #[arg(short, long, default_value = ".")]
        folder: PathBuf,

        /// Test only. Does not download files.
        #[arg(short, long)]
        test_mode: bool,

        /// Do not overwrite existing files.
        #[arg(short, long)]
        latest_only: bool,

        /// Feed URL (defaults to $DISPOSITION_FEED_URL, then the City of Winnipeg feed)
        #[arg(long)]
        feed_url: Option<String>,
    },

    /// Render a saved disposition JSON file as HTML
    Render {
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting processing for args: {:?}", args);

    match args.command {
        Command::Extract {
            inputs,
            output_dir,
            html,
        } => extract(inputs, output_dir, html).await,
        Command::Download {
            folder,
            test_mode,
            latest_only,
            feed_url,
        } => {
            let url = client::feed_url(feed_url.as_deref())?;
            let feed = client::download_feed(&url).await?;
            tracing::info!(
                "Feed lists {} regular and {} special dispositions",
                feed.regular_dispositions().len(),
                feed.special_dispositions().len()
            );
            let options = DownloadOptions {
                test_mode,
                latest_only,
                folder,
            };
            let written = client::download_dispositions(&feed, &options).await?;
            tracing::info!("Downloaded {} documents", written.len());
            Ok(())
        }
        Command::Render { input, output } => {
            let json = std::fs::read_to_string(&input)?;
            let record: DispositionRecord = serde_json::from_str(&json)
                .map_err(|e| AppError::Processing(format!("{}: {}", input.display(), e)))?;
            let html = render::render_disposition(&record);
            match output {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    tracing::info!("Saved HTML to {}", path.display());
                }
                None => print!("{}", html),
            }
            Ok(())
        }
    }
}

/// Extracts each input on a blocking worker, then writes or prints the
/// records in input order.
async fn extract(inputs: Vec<PathBuf>, output_dir: Option<PathBuf>, html: bool) -> Result<(), AppError> {
    let storage = output_dir.as_ref().map(StorageManager::new).transpose()?;

    let handles: Vec<_> = inputs
        .iter()
        .cloned()
        .map(|path| {
            tokio::task::spawn_blocking(move || -> Result<DispositionRecord, AppError> {
                tracing::info!("Extracting {}", path.display());
                let disposition = Disposition::open(&path)?;
                Ok(disposition.to_record())
            })
        })
        .collect();

    let mut success_count = 0;
    let mut failure_count = 0;
    let mut printed = Vec::new();

    for (path, handle) in inputs.iter().zip(handles) {
        let result = handle
            .await
            .map_err(|e| AppError::Processing(format!("worker for {} failed: {}", path.display(), e)))?;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Failed to extract {}: {}", path.display(), e);
                failure_count += 1;
                continue;
            }
        };

        for failure in &record.failures {
            tracing::warn!("{}: section {} incomplete: {}", path.display(), failure.section, failure.message);
        }
        success_count += 1;

        match &storage {
            Some(storage) => {
                let stem = storage::record_stem(&record, &file_stem(path));
                storage.save_record(&record, &stem)?;
                if html {
                    storage.save_html(&render::render_disposition(&record), &stem)?;
                }
            }
            None => printed.push(record),
        }
    }

    if storage.is_none() {
        let json = if printed.len() == 1 {
            serde_json::to_string_pretty(&printed[0])
        } else {
            serde_json::to_string_pretty(&printed)
        }
        .map_err(|e| AppError::Processing(e.to_string()))?;
        println!("{}", json);
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract any dispositions from {} documents",
            failure_count
        )));
    }

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "disposition".to_string())
}
